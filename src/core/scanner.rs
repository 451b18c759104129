//! Wallet Scanner - scan orchestrator
//!
//! classify → fetch activity (+ sanctions on Ethereum) → match registries
//! → score → classify risk → assemble.
//!
//! Only a malformed address fails a scan. Every upstream problem degrades the
//! result and shows up in `warnings`. No retries, no shared mutable state;
//! dropping the returned future cancels in-flight calls.

use alloy_primitives::Address;
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, warn};

use crate::core::classifier::parse_address;
use crate::core::registry::{exchange_label, match_transactions};
use crate::core::risk_score::{classify_risk, TraceabilityScore};
use crate::models::config::ScanConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Chain, ChainActivity, ScanResult, WalletAddress};
use crate::providers::{
    BlockchainInfoClient, EtherscanClient, HttpFetcher, SanctionsOracle, SanctionsOutcome,
};

/// Deep-scan engine. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct WalletScanner {
    etherscan: EtherscanClient,
    blockchain_info: BlockchainInfoClient,
    oracle: SanctionsOracle,
}

impl WalletScanner {
    pub fn new(config: &ScanConfig) -> AppResult<Self> {
        if config.etherscan_base_url.is_empty() || config.blockchain_info_base_url.is_empty() {
            return Err(AppError::invalid_config("Provider base URLs must not be empty"));
        }
        Address::from_str(&config.sanctions_oracle_address).map_err(|e| {
            AppError::invalid_config(format!(
                "SANCTIONS_ORACLE_ADDRESS is not an Ethereum address: {}",
                e
            ))
        })?;

        let fetcher = HttpFetcher::new(config.request_timeout)?;
        let oracle_fetcher = HttpFetcher::new(config.oracle_timeout)?;

        let etherscan = EtherscanClient::new(
            config.etherscan_base_url.clone(),
            config.etherscan_api_key.clone(),
            fetcher.clone(),
            config.eth_tx_cap,
        );
        let oracle_client = EtherscanClient::new(
            config.etherscan_base_url.clone(),
            config.etherscan_api_key.clone(),
            oracle_fetcher,
            config.eth_tx_cap,
        );
        let blockchain_info = BlockchainInfoClient::new(
            config.blockchain_info_base_url.clone(),
            fetcher,
            config.btc_tx_limit,
        );

        info!(
            "🔧 Scanner ready (timeout: {:?}, oracle timeout: {:?}, api key: {})",
            config.request_timeout,
            config.oracle_timeout,
            if config.etherscan_api_key.is_some() { "set" } else { "none" }
        );

        Ok(Self {
            etherscan,
            blockchain_info,
            oracle: SanctionsOracle::new(oracle_client, config.sanctions_oracle_address.clone()),
        })
    }

    /// Deep-scan one address. Errors only on malformed input (`ADDR_INVALID`).
    pub async fn scan(&self, address: &str, chain_hint: Option<&str>) -> AppResult<ScanResult> {
        let start = Instant::now();
        let subject = parse_address(address, chain_hint)?;
        info!("🔍 Deep scan {} ({})", subject.as_str(), subject.chain());

        let mut result = match subject.chain() {
            Chain::Ethereum => {
                let (activity, sanctions) = tokio::join!(
                    self.etherscan.fetch_activity(&subject),
                    self.oracle.screen(&subject)
                );
                assemble(&subject, activity, sanctions)
            }
            Chain::Bitcoin => {
                let activity = self.blockchain_info.fetch_activity(&subject).await;
                assemble(&subject, activity, SanctionsOutcome::default())
            }
            Chain::Unsupported(reason) => {
                warn!("⚠️ Skipping deep scan of {}: {}", subject.as_str(), reason);
                unsupported(&subject)
            }
        };

        result.set_latency(start);
        info!(
            "✅ {} | score {}/100 | {} | {} warning(s) | {}ms",
            result.address,
            result.traceability_score,
            result.risk_level.as_str(),
            result.warnings.len(),
            result.latency_ms
        );
        Ok(result)
    }
}

/// Build a scored result from adapter output and the sanctions outcome. Pure.
pub fn assemble(
    subject: &WalletAddress,
    activity: ChainActivity,
    sanctions: SanctionsOutcome,
) -> ScanResult {
    let mut result = ScanResult::empty(subject);
    let matches = match_transactions(subject.chain(), &activity.transactions);

    result.apply_activity(activity);
    result.exchange_interactions = matches.exchange_interactions;
    result.exchanges_detected = matches.exchanges_detected;
    result.mixer_interactions = matches.mixer_interactions;
    result.used_mixer = matches.used_mixer;
    result.counterparties = matches.counterparties;

    if let Some(label) = exchange_label(subject.chain(), subject.as_str()) {
        result.labeled = true;
        result.label = Some(label.to_string());
    }

    result.sanctioned = sanctions.sanctioned;
    result.warnings.extend(sanctions.warning);

    score(&mut result);
    result
}

/// Empty result for a chain we cannot scan, scored 0 / SAFE
pub fn unsupported(subject: &WalletAddress) -> ScanResult {
    let mut result = ScanResult::empty(subject);
    result.warnings.push(format!(
        "Deep scan skipped: chain not supported ({})",
        subject.chain().as_str()
    ));
    score(&mut result);
    result
}

fn score(result: &mut ScanResult) {
    let score = TraceabilityScore::evaluate(result, result.sanctioned);
    let risk = classify_risk(score.total, result.sanctioned, result.used_mixer);
    result.apply_score(score.total, score.details(), risk);
}
