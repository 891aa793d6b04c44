//! Scanning and loading of the on-disk results tree
//!
//! Everything here is synchronous and re-reads the filesystem on every call.
//! Failures below the workload level are logged and the offending run is
//! dropped; failures at the root, job or workload level are returned.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{DashboardError, Result};
use crate::model::{Job, JobSummary, Measurement, Run, Workload};

/// File name of the per-run summary
pub const SUMMARY_FILE: &str = "jobSummary.json";

/// Glob matched against file names inside a run directory
pub const MEASUREMENT_GLOB: &str = "*QuantilesMeasurement*.json";

/// Root of a results tree, with name-to-path resolution for request handlers
#[derive(Debug, Clone)]
pub struct ResultsTree {
    root: PathBuf,
}

impl ResultsTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn jobs(&self) -> Result<Vec<Job>> {
        list_jobs(&self.root)
    }

    pub fn job_path(&self, job: &str) -> Result<PathBuf> {
        Ok(self.root.join(validate_name(job)?))
    }

    pub fn workload_path(&self, job: &str, workload: &str) -> Result<PathBuf> {
        Ok(self.job_path(job)?.join(validate_name(workload)?))
    }
}

/// Reject names that would address anything other than a direct child directory
pub fn validate_name(name: &str) -> Result<&str> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');

    if invalid {
        Err(DashboardError::InvalidName(name.to_string()))
    } else {
        Ok(name)
    }
}

/// Immediate subdirectories of `path`, sorted by name
fn subdirectories(path: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(path).map_err(|e| DashboardError::io(path, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DashboardError::io(path, e))?;
        let entry_path = entry.path();
        if !entry_path.is_dir() {
            continue;
        }
        // Names that are not UTF-8 cannot be linked back to from a URL
        match entry.file_name().into_string() {
            Ok(name) => dirs.push((name, entry_path)),
            Err(raw) => debug!("Skipping non UTF-8 directory {:?}", raw),
        }
    }

    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// List every job under the results root together with its workloads
pub fn list_jobs(root: &Path) -> Result<Vec<Job>> {
    let jobs = subdirectories(root)?
        .into_iter()
        .map(|(name, path)| {
            let workloads = list_workloads(&path).unwrap_or_else(|e| {
                warn!("Failed to list workloads for job {}: {}", name, e);
                Vec::new()
            });
            Job {
                name,
                path,
                workloads,
            }
        })
        .collect();

    Ok(jobs)
}

/// List the workloads of one job without descending into runs
pub fn list_workloads(job_path: &Path) -> Result<Vec<Workload>> {
    let workloads = subdirectories(job_path)?
        .into_iter()
        .map(|(name, path)| {
            let run_count = match fs::read_dir(&path) {
                Ok(entries) => entries.count(),
                Err(e) => {
                    debug!("Failed to count runs in {}: {}", path.display(), e);
                    0
                }
            };
            Workload {
                name,
                path,
                run_count,
            }
        })
        .collect();

    Ok(workloads)
}

/// Load every readable run of a workload, oldest summary first
pub fn load_runs(workload_path: &Path) -> Result<Vec<Run>> {
    let run_dirs = subdirectories(workload_path)?;
    debug!("Loading {} runs from {}", run_dirs.len(), workload_path.display());

    let mut runs = Vec::with_capacity(run_dirs.len());
    for (name, path) in run_dirs {
        let measurements = match load_measurements(&path) {
            Ok(measurements) => measurements,
            Err(e) => {
                warn!("Skipping run {}: {}", path.display(), e);
                continue;
            }
        };

        let summary = match load_summary(&path) {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Skipping run {}: {}", path.display(), e);
                continue;
            }
        };

        runs.push(Run {
            name,
            path,
            summary,
            measurements,
        });
    }

    runs.sort_by_key(|run| run.summary.timestamp);
    Ok(runs)
}

/// Decode and concatenate all quantile measurement files of a run
pub fn load_measurements(run_path: &Path) -> Result<Vec<Measurement>> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&run_path.to_string_lossy()),
        MEASUREMENT_GLOB
    );

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(file) => files.push(file),
            Err(e) => warn!("Failed to read measurement file entry: {}", e),
        }
    }

    if files.is_empty() {
        return Err(DashboardError::NoMeasurementFiles(run_path.to_path_buf()));
    }

    let mut all_measurements = Vec::new();
    for file in files {
        match read_json::<Vec<Measurement>>(&file) {
            Ok(measurements) => all_measurements.extend(measurements),
            Err(e) => warn!("Ignoring measurement file: {}", e),
        }
    }

    Ok(all_measurements)
}

/// First record of the run's `jobSummary.json`
pub fn load_summary(run_path: &Path) -> Result<JobSummary> {
    let summary_path = run_path.join(SUMMARY_FILE);
    read_json::<Vec<JobSummary>>(&summary_path)?
        .into_iter()
        .next()
        .ok_or_else(|| DashboardError::EmptySummary(run_path.to_path_buf()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path).map_err(|e| DashboardError::io(path, e))?;
    serde_json::from_slice(&data).map_err(|e| DashboardError::json(path, e))
}
