//! Wallet Trace API Server
//!
//! REST API for wallet deep scans
//!
//! Usage:
//!   cargo run --bin wallet_trace_api
//!
//! Environment:
//!   PORT / WALLET_TRACE_PORT - Server port (default: 8080)
//!   WALLET_TRACE_HOST        - Server host (default: 0.0.0.0)
//!   RUST_LOG                 - Log level (default: info)
//!   ETHERSCAN_API_KEY etc.   - Scanner settings, see ScanConfig

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wallet_trace::api::{create_router, AppState};
use wallet_trace::{ScanConfig, ServerConfig, WalletScanner, APP_NAME, APP_VERSION};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let scanner = WalletScanner::new(&ScanConfig::from_env())?;
    let state = Arc::new(AppState::new(scanner));
    let app = create_router(state);

    let server = ServerConfig::from_env();
    let addr: SocketAddr = server.bind_addr().parse()?;

    info!("🚀 {} API v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("Endpoints:");
    info!("  POST /v1/scan/wallet  - Deep scan + traceability score");
    info!("  GET  /v1/health       - Health check");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 {} API shutdown complete", APP_NAME);
    Ok(())
}
