use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for burnview
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("No *QuantilesMeasurement*.json files found in {}", .0.display())]
    NoMeasurementFiles(PathBuf),

    #[error("No job summary found in {}", .0.display())]
    EmptySummary(PathBuf),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl DashboardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DashboardError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DashboardError::Json {
            path: path.into(),
            source,
        }
    }

    /// HTTP status a request handler answers with when this error ends the request
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                StatusCode::NOT_FOUND
            }
            DashboardError::InvalidName(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
