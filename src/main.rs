use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qrnexus::server::{router, AppState, ServerConfig};
use qrnexus::tracker::MemoryStore;

#[derive(Parser, Debug)]
#[command(name = "qrnexus")]
#[command(about = "Styled QR rendering and scan-tracking redirect service", long_about = None)]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Base URL for generated tracking links
    #[arg(long, default_value = "https://track.qrnexus.site")]
    tracking_base: String,

    /// Destination for scans that cannot be resolved
    #[arg(long, default_value = "https://qrnexus.site")]
    fallback: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("qrnexus v{}", env!("CARGO_PKG_VERSION"));
    info!("tracking base: {}", args.tracking_base);

    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        config: ServerConfig {
            tracking_base: args.tracking_base,
            fallback_destination: args.fallback,
        },
    };
    let app = router(state);

    let addr: std::net::SocketAddr = args.listen.parse().context("Invalid listen address")?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
