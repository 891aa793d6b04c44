//! burnview dashboard server
//!
//! Serves the job list and job detail pages for a kube-burner results
//! directory.

use anyhow::Result;
use burnview::{Cli, DashboardConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --dev
    let default_level = if cli.dev { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = DashboardConfig::from(&cli);
    burnview::serve(config).await
}
