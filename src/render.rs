//! HTML pages rendered with askama templates
//!
//! Templates live in `templates/` and are compiled into the binary. The
//! detail page carries its chart data inline so the browser never has to
//! fetch it separately.

use askama::Template;
use serde::Serialize;

use crate::aggregate::MetricGroup;
use crate::error::Result;
use crate::model::{Job, Run, Workload};

/// Link to a job page, optionally narrowed to one workload
///
/// Names are percent-encoded as path segments.
pub fn job_href(job: &str, workload: Option<&str>) -> String {
    let Ok(mut url) = url::Url::parse("http://burnview/") else {
        return String::from("/");
    };

    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push("job").push(job);
        if let Some(workload) = workload {
            segments.push(workload);
        }
    }

    url.path().to_string()
}

/// Serialize `value` as JSON that can sit inside a `<script>` element
///
/// `<`, `>` and `&` only occur inside JSON strings, so replacing them with
/// their `\u` escapes keeps the value identical while making `</script>` and
/// `<!--` impossible.
pub fn script_safe_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

pub struct WorkloadLink {
    pub name: String,
    pub href: String,
    pub run_count: usize,
    pub selected: bool,
}

impl WorkloadLink {
    fn build(job: &str, workloads: &[Workload], selected: Option<&str>) -> Vec<Self> {
        workloads
            .iter()
            .map(|w| WorkloadLink {
                name: w.name.clone(),
                href: job_href(job, Some(w.name.as_str())),
                run_count: w.run_count,
                selected: selected == Some(w.name.as_str()),
            })
            .collect()
    }
}

pub struct JobRow {
    pub name: String,
    pub href: String,
    pub workloads: Vec<WorkloadLink>,
}

pub struct RunRow {
    pub name: String,
    pub timestamp: String,
    pub elapsed: String,
    pub measurement_count: usize,
}

impl From<&Run> for RunRow {
    fn from(run: &Run) -> Self {
        RunRow {
            name: run.name.clone(),
            timestamp: run.summary.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            elapsed: run.summary.elapsed_time().unwrap_or_else(|| "-".to_string()),
            measurement_count: run.measurements.len(),
        }
    }
}

#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobListPage {
    pub results_dir: String,
    pub jobs: Vec<JobRow>,
}

impl JobListPage {
    pub fn new(results_dir: &str, jobs: &[Job]) -> Self {
        let jobs = jobs
            .iter()
            .map(|job| JobRow {
                name: job.name.clone(),
                href: job_href(&job.name, None),
                workloads: WorkloadLink::build(&job.name, &job.workloads, None),
            })
            .collect();

        Self {
            results_dir: results_dir.to_string(),
            jobs,
        }
    }
}

#[derive(Template)]
#[template(path = "job_detail.html")]
pub struct JobDetailPage {
    pub job: String,
    pub job_href: String,
    pub workloads: Vec<WorkloadLink>,
    /// `None` while the visitor still has to pick a workload
    pub workload: Option<String>,
    pub runs: Vec<RunRow>,
    pub metric_count: usize,
    pub series_count: usize,
    pub point_count: usize,
    pub metric_groups_json: String,
}

impl JobDetailPage {
    /// Workload picker without chart data
    pub fn selection(job: &str, workloads: &[Workload]) -> Self {
        Self {
            job: job.to_string(),
            job_href: job_href(job, None),
            workloads: WorkloadLink::build(job, workloads, None),
            workload: None,
            runs: Vec::new(),
            metric_count: 0,
            series_count: 0,
            point_count: 0,
            metric_groups_json: String::from("[]"),
        }
    }

    pub fn charts(
        job: &str,
        workloads: &[Workload],
        workload: &str,
        runs: &[Run],
        groups: &[MetricGroup],
    ) -> Result<Self> {
        Ok(Self {
            job: job.to_string(),
            job_href: job_href(job, None),
            workloads: WorkloadLink::build(job, workloads, Some(workload)),
            workload: Some(workload.to_string()),
            runs: runs.iter().map(RunRow::from).collect(),
            metric_count: groups.len(),
            series_count: groups.iter().map(MetricGroup::series_count).sum(),
            point_count: groups.iter().map(MetricGroup::point_count).sum(),
            metric_groups_json: script_safe_json(&groups)?,
        })
    }
}
