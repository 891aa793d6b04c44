//! Helpers that lay out kube-burner style results trees in temp directories

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

pub struct ResultsFixture {
    pub dir: TempDir,
}

impl ResultsFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// A run directory with a summary stamped `timestamp` and one measurement file
    pub fn run(&self, rel: &str, timestamp: &str, measurements: &[(&str, &str, f64, &str)]) -> PathBuf {
        let path = self.mkdir(rel);
        write_summary(&path, timestamp);
        write_measurements(&path, "podLatencyQuantilesMeasurement-node-density.json", measurements);
        path
    }
}

pub fn write_summary(run: &Path, timestamp: &str) {
    let summary = json!([{
        "timestamp": timestamp,
        "endTimestamp": timestamp,
        "elapsedTime": 42.5,
        "uuid": "c1a8d2c4-9c1e-4a6b-b1f3-2f7c2d0b7e11",
        "metricName": "jobSummary",
        "version": "1.10.0",
        "passed": true,
        "jobConfig": {
            "name": "node-density",
            "jobIterations": 10,
            "qps": 20
        }
    }]);
    fs::write(run.join("jobSummary.json"), summary.to_string()).unwrap();
}

/// `measurements` holds (metric, quantile, P99, timestamp) tuples
pub fn write_measurements(run: &Path, file_name: &str, measurements: &[(&str, &str, f64, &str)]) {
    let records: Vec<serde_json::Value> = measurements
        .iter()
        .map(|(metric, quantile, p99, timestamp)| {
            json!({
                "quantileName": quantile,
                "uuid": "c1a8d2c4-9c1e-4a6b-b1f3-2f7c2d0b7e11",
                "P99": p99,
                "P95": p99 * 0.9,
                "P50": p99 * 0.5,
                "min": 1,
                "max": p99 + 1.0,
                "avg": p99 * 0.6,
                "timestamp": timestamp,
                "metricName": metric,
                "jobName": "node-density",
                "metadata": {"platform": "AWS", "ocpVersion": "4.15"}
            })
        })
        .collect();
    fs::write(run.join(file_name), serde_json::Value::Array(records).to_string()).unwrap();
}
