//! HTTP routes of the dashboard
//!
//! Every request re-reads the results tree; nothing is cached between
//! requests. Filesystem work runs on the blocking thread pool.

use std::sync::Arc;

use anyhow::Context;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::aggregate::aggregate_runs;
use crate::assets;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::render::{job_href, JobDetailPage, JobListPage};
use crate::results::{list_workloads, load_runs, ResultsTree};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn tree(&self) -> ResultsTree {
        ResultsTree::new(&self.config.results_dir)
    }
}

/// Error answered to the client as a plain-text status response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    /// Every failure becomes a 500, whatever its cause
    fn internal(err: DashboardError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(job_list))
        .route("/job/:job", get(job_overview))
        .route("/job/:job/:workload", get(workload_detail))
        .route("/static/*path", get(assets::serve_asset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: DashboardConfig) -> anyhow::Result<()> {
    let bind_addr = config.socket_addr();
    info!("Results served from: {}", config.results_dir.display());

    let app = router(AppState::new(config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Server starting on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

/// Run blocking filesystem work off the async workers
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

fn render_page<T: Template>(page: &T) -> Result<Html<String>> {
    Ok(Html(page.render()?))
}

async fn job_list(State(state): State<AppState>) -> std::result::Result<Html<String>, AppError> {
    let tree = state.tree();
    let root = tree.root().display().to_string();

    let jobs = blocking(move || tree.jobs()).await.map_err(|e| {
        warn!("Error loading jobs: {}", e);
        AppError::internal(e)
    })?;
    debug!("Listing {} jobs", jobs.len());

    render_page(&JobListPage::new(&root, &jobs)).map_err(AppError::internal)
}

async fn job_overview(
    State(state): State<AppState>,
    Path(job): Path<String>,
) -> std::result::Result<Response, AppError> {
    let job_path = state.tree().job_path(&job)?;

    let workloads = blocking(move || list_workloads(&job_path))
        .await
        .map_err(|e| {
            warn!("Error loading workloads for job {}: {}", job, e);
            e
        })?;

    if let [only] = workloads.as_slice() {
        let target = job_href(&job, Some(&only.name));
        debug!("Job {} has a single workload, redirecting to {}", job, target);
        return Ok(Redirect::temporary(&target).into_response());
    }

    Ok(render_page(&JobDetailPage::selection(&job, &workloads))?.into_response())
}

async fn workload_detail(
    State(state): State<AppState>,
    Path((job, workload)): Path<(String, String)>,
) -> std::result::Result<Html<String>, AppError> {
    let tree = state.tree();
    let job_path = tree.job_path(&job)?;
    let workload_path = tree.workload_path(&job, &workload)?;

    let (workloads, runs) = blocking(move || {
        let workloads = list_workloads(&job_path)?;
        let runs = load_runs(&workload_path)?;
        Ok((workloads, runs))
    })
    .await
    .map_err(|e| {
        warn!("Error loading runs for {}/{}: {}", job, workload, e);
        e
    })?;

    let groups = aggregate_runs(&runs);
    info!(
        "Loaded {} runs and {} metric groups for {}/{}",
        runs.len(),
        groups.len(),
        job,
        workload
    );

    let page = JobDetailPage::charts(&job, &workloads, &workload, &runs, &groups)?;
    Ok(render_page(&page)?)
}
