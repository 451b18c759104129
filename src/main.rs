//! Wallet Trace CLI - deep-scan one address from the terminal
//!
//! Usage:
//!   wallet_trace 0x3f5CE5FBFe3E9af3971dD833D26bA9b5C936f0bE
//!   wallet_trace 1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa --json
//!
//! Environment: see `ScanConfig::from_env`. Logs go to stderr (RUST_LOG, default info).

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use wallet_trace::{ScanConfig, WalletScanner, APP_NAME, APP_VERSION};

/// Wallet deep-scan and traceability engine
#[derive(Parser)]
#[command(name = "wallet_trace")]
#[command(about = "Estimate how identifiable a wallet's owner is from its on-chain footprint")]
#[command(version)]
struct Cli {
    /// Address to scan (Ethereum 0x..., Bitcoin 1.../3.../bc1...)
    address: String,

    /// Chain hint, only used when the address shape is not recognized
    #[arg(long)]
    chain: Option<String>,

    /// Print the full result as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    tracing::info!("🚀 {} v{}", APP_NAME, APP_VERSION);

    let scanner = WalletScanner::new(&ScanConfig::from_env())?;
    let result = scanner.scan(&cli.address, cli.chain.as_deref()).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.summary());
    }

    Ok(())
}
