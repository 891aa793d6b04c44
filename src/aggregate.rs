//! Grouping of measurements into chart series
//!
//! Output order is fully determined by metric name, quantile name and
//! timestamp; it never depends on the order runs or files were read in.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{JobSummary, Run};

/// One point of a quantile series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub p99: f64,
    pub p95: f64,
    pub p50: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// Summary of the run the measurement came from
    pub job_summary: JobSummary,
}

/// Time-ordered points for one (metric, quantile) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantileSeries {
    pub quantile_name: String,
    pub datapoints: Vec<DataPoint>,
}

/// All quantile series of one metric, sorted by quantile name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricGroup {
    pub metric_name: String,
    pub quantiles: Vec<QuantileSeries>,
}

impl MetricGroup {
    pub fn series_count(&self) -> usize {
        self.quantiles.len()
    }

    pub fn point_count(&self) -> usize {
        self.quantiles.iter().map(|q| q.datapoints.len()).sum()
    }
}

/// Group every measurement of every run by metric and quantile name
pub fn aggregate_runs<'a, I>(runs: I) -> Vec<MetricGroup>
where
    I: IntoIterator<Item = &'a Run>,
{
    let mut buckets: BTreeMap<(String, String), Vec<DataPoint>> = BTreeMap::new();

    for run in runs {
        for measurement in &run.measurements {
            buckets
                .entry((
                    measurement.metric_name.clone(),
                    measurement.quantile_name.clone(),
                ))
                .or_default()
                .push(DataPoint {
                    timestamp: measurement.timestamp,
                    p99: measurement.p99,
                    p95: measurement.p95,
                    p50: measurement.p50,
                    min: measurement.min,
                    max: measurement.max,
                    avg: measurement.avg,
                    job_summary: run.summary.clone(),
                });
        }
    }

    // BTreeMap iteration already yields keys ordered by metric, then quantile
    let mut groups: Vec<MetricGroup> = Vec::new();
    for ((metric_name, quantile_name), mut datapoints) in buckets {
        datapoints.sort_by_key(|p| p.timestamp);
        let series = QuantileSeries {
            quantile_name,
            datapoints,
        };

        match groups.last_mut() {
            Some(group) if group.metric_name == metric_name => group.quantiles.push(series),
            _ => groups.push(MetricGroup {
                metric_name,
                quantiles: vec![series],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Measurement;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap()
    }

    fn measurement(metric: &str, quantile: &str, p99: f64, at: DateTime<Utc>) -> Measurement {
        Measurement {
            metric_name: metric.to_string(),
            quantile_name: quantile.to_string(),
            p99,
            timestamp: at,
            ..Default::default()
        }
    }

    fn run(name: &str, at: DateTime<Utc>, measurements: Vec<Measurement>) -> Run {
        Run {
            name: name.to_string(),
            path: PathBuf::from(name),
            summary: JobSummary {
                timestamp: at,
                ..Default::default()
            },
            measurements,
        }
    }

    #[test]
    fn test_two_runs_single_series() {
        let runs = vec![
            run("a", ts(1), vec![measurement("pod", "Ready", 5.0, ts(1))]),
            run("b", ts(2), vec![measurement("pod", "Ready", 9.0, ts(2))]),
        ];

        let groups = aggregate_runs(&runs);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].metric_name, "pod");
        assert_eq!(groups[0].quantiles.len(), 1);

        let series = &groups[0].quantiles[0];
        assert_eq!(series.quantile_name, "Ready");
        let points: Vec<(DateTime<Utc>, f64)> =
            series.datapoints.iter().map(|p| (p.timestamp, p.p99)).collect();
        assert_eq!(points, vec![(ts(1), 5.0), (ts(2), 9.0)]);
        assert_eq!(series.datapoints[1].job_summary.timestamp, ts(2));
    }

    #[test]
    fn test_groups_sorted_by_metric() {
        let runs = vec![run(
            "a",
            ts(1),
            vec![
                measurement("svc", "Ready", 1.0, ts(1)),
                measurement("pod", "Ready", 2.0, ts(1)),
            ],
        )];

        let names: Vec<String> = aggregate_runs(&runs)
            .into_iter()
            .map(|g| g.metric_name)
            .collect();
        assert_eq!(names, vec!["pod", "svc"]);
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let forward = vec![
            run(
                "a",
                ts(1),
                vec![
                    measurement("pod", "Scheduled", 1.0, ts(1)),
                    measurement("pod", "Ready", 2.0, ts(1)),
                    measurement("svc", "Ready", 3.0, ts(1)),
                ],
            ),
            run(
                "b",
                ts(5),
                vec![
                    measurement("pod", "Ready", 4.0, ts(5)),
                    measurement("pod", "Initialized", 5.0, ts(5)),
                ],
            ),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        for r in &mut backward {
            r.measurements.reverse();
        }

        let a = aggregate_runs(&forward);
        let b = aggregate_runs(&backward);
        assert_eq!(a, b);

        let pod = &a[0];
        let quantiles: Vec<&str> = pod.quantiles.iter().map(|q| q.quantile_name.as_str()).collect();
        assert_eq!(quantiles, vec!["Initialized", "Ready", "Scheduled"]);

        let ready: Vec<f64> = pod.quantiles[1].datapoints.iter().map(|p| p.p99).collect();
        assert_eq!(ready, vec![2.0, 4.0]);
        assert_eq!(pod.series_count(), 3);
        assert_eq!(pod.point_count(), 4);
    }

    #[test]
    fn test_points_sorted_by_measurement_timestamp() {
        // Run order and measurement timestamps disagree on purpose
        let runs = vec![run(
            "a",
            ts(1),
            vec![
                measurement("pod", "Ready", 3.0, ts(30)),
                measurement("pod", "Ready", 1.0, ts(10)),
                measurement("pod", "Ready", 2.0, ts(20)),
            ],
        )];

        let groups = aggregate_runs(&runs);
        let values: Vec<f64> = groups[0].quantiles[0].datapoints.iter().map(|p| p.p99).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_no_runs_no_groups() {
        assert!(aggregate_runs(&Vec::<Run>::new()).is_empty());
        assert!(aggregate_runs(&[run("a", ts(1), Vec::new())]).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let runs = vec![run("a", ts(1), vec![measurement("pod", "Ready", 5.0, ts(1))])];
        let value = serde_json::to_value(aggregate_runs(&runs)).unwrap();

        assert_eq!(value[0]["metricName"], "pod");
        assert_eq!(value[0]["quantiles"][0]["quantileName"], "Ready");
        let point = &value[0]["quantiles"][0]["datapoints"][0];
        assert_eq!(point["p99"], 5.0);
        assert_eq!(point["jobSummary"]["timestamp"], "2024-03-01T10:01:00Z");
    }
}
