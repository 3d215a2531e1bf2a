//! mimird: Mimir daemon.
//!
//! Serves the [`RequestRouter`](mimir::RequestRouter) over HTTP, caching
//! objects from the configured bucket origin.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use mimir::server::config::Config;
use mimir::server::{AppState, build_router};

/// Mimir daemon: revalidating cache in front of an object-storage bucket.
#[derive(Parser)]
#[command(name = "mimird")]
#[command(version = mimir::PKG_VERSION)]
#[command(about = "Mimir bucket cache daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Origin bucket host; overrides the configuration file.
    #[arg(long)]
    origin_host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(host) = args.origin_host {
        config.origin.host = Some(host);
    }

    let router = config.builder().build()?;

    // Parse address
    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| mimir::MimirError::Configuration(format!("Invalid address: {e}")))?;

    info!(
        version = %mimir::version_string(),
        %addr,
        origin = router.target().map(|t| t.base().as_str()).unwrap_or("<unset>"),
        "mimird starting"
    );

    let app = build_router(AppState::new(
        router,
        config.server.limits.request_timeout(),
    ));
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
