use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Command line of the dashboard server
#[derive(Parser, Debug)]
#[command(name = "burnview")]
#[command(about = "Dashboard for kube-burner performance results")]
#[command(version)]
pub struct Cli {
    /// Path to the directory holding results
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Enable development mode (more verbose logging)
    #[arg(long)]
    pub dev: bool,
}

/// Dashboard server configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub results_dir: PathBuf,
    pub host: IpAddr,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        }
    }
}

impl DashboardConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl From<&Cli> for DashboardConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            results_dir: cli.results_dir.clone(),
            host: cli.host,
            port: cli.port,
        }
    }
}
