//! Providers Module - External Data Sources
//!
//! Chain-data adapters (Etherscan, blockchain.info) and the sanctions oracle,
//! all on top of one shared HTTP fetcher.

pub mod blockchain_info;
pub mod etherscan;
pub mod http;
pub mod sanctions;

pub use blockchain_info::BlockchainInfoClient;
pub use etherscan::EtherscanClient;
pub use http::HttpFetcher;
pub use sanctions::{SanctionsOracle, SanctionsOutcome};
