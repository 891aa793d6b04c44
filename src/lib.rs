//! burnview: a read-only dashboard for kube-burner results
//!
//! The dashboard scans a `{job}/{workload}/{run}` directory tree, decodes the
//! `jobSummary.json` and `*QuantilesMeasurement*.json` files of every run,
//! groups the measurements into per-metric, per-quantile time series and
//! renders them as HTML pages with client-side charts.

pub mod aggregate;
pub mod assets;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod results;
pub mod server;

pub use aggregate::{aggregate_runs, DataPoint, MetricGroup, QuantileSeries};
pub use config::{Cli, DashboardConfig};
pub use error::{DashboardError, Result};
pub use model::{Job, JobSummary, Measurement, Run, Workload};
pub use results::{list_jobs, list_workloads, load_measurements, load_runs, load_summary, ResultsTree};
pub use server::{router, serve, AppState};
