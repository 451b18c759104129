//! Configuration module for the wallet scanner
//!
//! Defaults come from utils/constants.rs; environment variables override them.
//! API keys are never logged.

use std::time::Duration;
use tracing::{info, warn};

use crate::utils::constants::{
    DEFAULT_BLOCKCHAIN_INFO_BASE_URL, DEFAULT_BTC_TX_LIMIT, DEFAULT_ETHERSCAN_BASE_URL,
    DEFAULT_ETH_TX_CAP, DEFAULT_ORACLE_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    SANCTIONS_ORACLE_ADDRESS,
};

/// Configuration for a [`crate::core::WalletScanner`]
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Etherscan-compatible API endpoint
    pub etherscan_base_url: String,
    /// Optional Etherscan API key (free tier works without one)
    pub etherscan_api_key: Option<String>,
    /// blockchain.info-compatible API endpoint
    pub blockchain_info_base_url: String,
    /// Sanctions oracle contract address
    pub sanctions_oracle_address: String,
    /// Timeout for chain-data provider calls
    pub request_timeout: Duration,
    /// Timeout for the sanctions oracle call
    pub oracle_timeout: Duration,
    /// Maximum Ethereum transactions fetched
    pub eth_tx_cap: u32,
    /// Maximum Bitcoin transactions fetched
    pub btc_tx_limit: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            etherscan_base_url: DEFAULT_ETHERSCAN_BASE_URL.to_string(),
            etherscan_api_key: None,
            blockchain_info_base_url: DEFAULT_BLOCKCHAIN_INFO_BASE_URL.to_string(),
            sanctions_oracle_address: SANCTIONS_ORACLE_ADDRESS.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
            eth_tx_cap: DEFAULT_ETH_TX_CAP,
            btc_tx_limit: DEFAULT_BTC_TX_LIMIT,
        }
    }
}

impl ScanConfig {
    /// Load configuration from environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get("ETHERSCAN_API_KEY").filter(|k| k != "YOUR_API_KEY") {
            info!("🔑 ETHERSCAN_API_KEY configured (key hidden)");
            config.etherscan_api_key = Some(key);
        }
        if let Some(url) = get("ETHERSCAN_BASE_URL") {
            config.etherscan_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = get("BLOCKCHAIN_INFO_BASE_URL") {
            config.blockchain_info_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(addr) = get("SANCTIONS_ORACLE_ADDRESS") {
            config.sanctions_oracle_address = addr;
        }

        if let Some(secs) = parse_positive(&get, "WALLET_TRACE_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_positive(&get, "WALLET_TRACE_ORACLE_TIMEOUT_SECS") {
            config.oracle_timeout = Duration::from_secs(secs);
        }
        if let Some(cap) = parse_positive(&get, "WALLET_TRACE_ETH_TX_CAP") {
            config.eth_tx_cap = cap.min(DEFAULT_ETH_TX_CAP as u64) as u32;
        }
        if let Some(limit) = parse_positive(&get, "WALLET_TRACE_BTC_TX_LIMIT") {
            config.btc_tx_limit = limit.min(u32::MAX as u64) as u32;
        }

        config
    }
}

/// Parse a strictly positive integer override; invalid values keep the default
fn parse_positive<G>(get: &G, key: &str) -> Option<u64>
where
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key)?;
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!("⚠️ Ignoring invalid {}={:?}, keeping default", key, raw);
            None
        }
    }
}

/// HTTP server settings for the scan API
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// PORT (platform-provided) wins over WALLET_TRACE_PORT
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("WALLET_TRACE_HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("WALLET_TRACE_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ScanConfig::from_lookup(lookup(&[]));
        assert_eq!(config.etherscan_base_url, DEFAULT_ETHERSCAN_BASE_URL);
        assert!(config.etherscan_api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.oracle_timeout, Duration::from_secs(15));
        assert_eq!(config.eth_tx_cap, 10_000);
        assert_eq!(config.btc_tx_limit, 100);
    }

    #[test]
    fn test_overrides() {
        let config = ScanConfig::from_lookup(lookup(&[
            ("ETHERSCAN_API_KEY", "abc123"),
            ("ETHERSCAN_BASE_URL", "http://localhost:9000/api/"),
            ("WALLET_TRACE_TIMEOUT_SECS", "5"),
            ("WALLET_TRACE_ETH_TX_CAP", "50000"),
        ]));
        assert_eq!(config.etherscan_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.etherscan_base_url, "http://localhost:9000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        // Capped at the provider's page limit
        assert_eq!(config.eth_tx_cap, 10_000);
    }

    #[test]
    fn test_invalid_overrides_keep_defaults() {
        let config = ScanConfig::from_lookup(lookup(&[
            ("ETHERSCAN_API_KEY", "YOUR_API_KEY"),
            ("WALLET_TRACE_TIMEOUT_SECS", "soon"),
            ("WALLET_TRACE_BTC_TX_LIMIT", "0"),
        ]));
        assert!(config.etherscan_api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.btc_tx_limit, 100);
    }
}
