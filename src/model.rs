//! Records decoded from a kube-burner results tree
//!
//! The on-disk layout is `{results}/{job}/{workload}/{run}/`, where every run
//! directory holds a `jobSummary.json` and one or more
//! `*QuantilesMeasurement*.json` files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// One quantile measurement record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Measurement {
    pub quantile_name: String,
    pub uuid: String,
    #[serde(rename = "P99", deserialize_with = "null_as_zero")]
    pub p99: f64,
    #[serde(rename = "P95", deserialize_with = "null_as_zero")]
    pub p95: f64,
    #[serde(rename = "P50", deserialize_with = "null_as_zero")]
    pub p50: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub min: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub max: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub avg: f64,
    pub timestamp: DateTime<Utc>,
    pub metric_name: String,
    pub job_name: String,
    pub metadata: serde_json::Value,
}

/// Statistics written as `null` read back as zero
fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// First element of a run's `jobSummary.json`
///
/// Only the timestamp is interpreted; `jobConfig` and every other field are
/// carried through untouched so the browser can show them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl JobSummary {
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }

    /// `elapsedTime` rendered for display, when the summary carries one
    pub fn elapsed_time(&self) -> Option<String> {
        match self.field("elapsedTime")? {
            serde_json::Value::Number(n) => n.as_f64().map(|secs| format!("{:.2}s", secs)),
            serde_json::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// A named top-level results directory
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub path: PathBuf,
    pub workloads: Vec<Workload>,
}

/// A named test scenario inside a job
#[derive(Debug, Clone)]
pub struct Workload {
    pub name: String,
    pub path: PathBuf,
    /// Entries under the workload directory, not checked to be run directories
    pub run_count: usize,
}

/// One execution of a workload
#[derive(Debug, Clone)]
pub struct Run {
    pub name: String,
    pub path: PathBuf,
    pub summary: JobSummary,
    pub measurements: Vec<Measurement>,
}
