//! Wallet Trace Library
//!
//! Deep-scan and traceability engine for cryptocurrency addresses:
//! - Rebuilds transaction history from Etherscan / blockchain.info
//! - Flags interactions with known custodial exchanges and mixers
//! - Screens Ethereum addresses against the on-chain sanctions oracle
//! - Scores how identifiable the owner likely is (0-100) with an explanation trail
//!
//! Entry point: [`WalletScanner::scan`].

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::classifier::{classify_chain, parse_address, validate_address};
pub use crate::core::risk_score::{classify_risk, TraceabilityScore, TraceabilityScoreBuilder};
pub use crate::core::scanner::WalletScanner;
pub use models::config::{ScanConfig, ServerConfig};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    Chain, ChainActivity, Direction, ExchangeInteraction, RiskLevel, ScanResult, Transaction,
    WalletAddress,
};
pub use utils::constants::{APP_NAME, APP_VERSION};
