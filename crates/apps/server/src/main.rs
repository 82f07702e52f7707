//! Triangulator - serves fan triangulations of stored point sets

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use triangulator_server::{ServerConfig, TriangulatorServer};

/// Triangulation service for point sets stored in the point set manager
#[derive(Parser)]
#[command(name = "triangulator")]
#[command(about = "Serve fan triangulations of stored point sets", long_about = None)]
struct Cli {
    /// Address to listen on (overrides TRIANGULATOR_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Point set manager base URL (overrides TRIANGULATOR_POINTSET_URL)
    #[arg(long)]
    pointset_url: Option<String>,

    /// Serve a built-in three point set instead of contacting the manager
    #[arg(long)]
    mock: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env().context("invalid configuration")?;
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if let Some(url) = cli.pointset_url {
        config.pointset_url = url;
    }
    config.use_mock |= cli.mock;

    let bind_address = config.bind_address.clone();
    let server = TriangulatorServer::from_config(config)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    server.run().await?;

    Ok(())
}
