//! blockchain.info Provider - Bitcoin-family chain adapter
//!
//! A single `rawaddr` call returns balance, total count and the most recent
//! transactions. Provider order is newest first; first/last seen are computed
//! as min/max so ordering never leaks into the result.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{ChainActivity, Direction, Transaction, WalletAddress};
use crate::providers::http::HttpFetcher;
use crate::utils::constants::{format_satoshi, timestamp_from_secs};

#[derive(Debug, Deserialize)]
pub struct RawAddressInfo {
    #[serde(default)]
    pub final_balance: Option<u64>,
    #[serde(default)]
    pub n_tx: Option<u64>,
    #[serde(default)]
    pub txs: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawTx {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    inputs: Vec<RawInput>,
    #[serde(default)]
    out: Vec<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    #[serde(default)]
    prev_out: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    #[serde(default)]
    addr: Option<String>,
    #[serde(default)]
    value: Option<u64>,
}

/// blockchain.info-compatible client
#[derive(Clone)]
pub struct BlockchainInfoClient {
    base_url: String,
    fetcher: HttpFetcher,
    tx_limit: u32,
}

impl BlockchainInfoClient {
    pub fn new(base_url: impl Into<String>, fetcher: HttpFetcher, tx_limit: u32) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
            tx_limit,
        }
    }

    pub async fn fetch_address_info(&self, address: &str) -> AppResult<RawAddressInfo> {
        let url = format!("{}/rawaddr/{}", self.base_url, address);
        self.fetcher
            .get_json(&url, &[("limit", self.tx_limit.to_string())])
            .await
    }

    /// Balance and recent history; failures become warnings
    pub async fn fetch_activity(&self, subject: &WalletAddress) -> ChainActivity {
        match self.fetch_address_info(subject.as_str()).await {
            Ok(info) => parse_address_info(subject.as_str(), info),
            Err(e) => {
                let e = e.context("blockchain.info");
                warn!("⚠️ {}", e);
                ChainActivity {
                    warnings: vec![e.to_warning()],
                    ..ChainActivity::default()
                }
            }
        }
    }
}

/// Normalize a `rawaddr` response relative to `subject`.
/// Emits one [`Transaction`] per (tx, counterparty), counterparties in sorted order.
pub fn parse_address_info(subject: &str, info: RawAddressInfo) -> ChainActivity {
    let mut activity = ChainActivity {
        balance: info.final_balance.map(format_satoshi),
        tx_count: info.n_tx.unwrap_or(info.txs.len() as u64),
        ..ChainActivity::default()
    };

    let mut skipped = 0usize;
    for record in info.txs {
        let raw = match serde_json::from_value::<RawTx>(record) {
            Ok(raw) if !raw.hash.is_empty() => raw,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let timestamp = match raw.time {
            Some(secs) => match timestamp_from_secs(secs) {
                Some(ts) => Some(ts),
                None => {
                    skipped += 1;
                    continue;
                }
            },
            None => None,
        };

        if let Some(ts) = timestamp {
            activity.first_seen = Some(activity.first_seen.map_or(ts, |f| f.min(ts)));
            activity.last_seen = Some(activity.last_seen.map_or(ts, |l| l.max(ts)));
        }

        let inputs: BTreeSet<String> = raw
            .inputs
            .iter()
            .filter_map(|i| i.prev_out.as_ref().and_then(|p| p.addr.clone()))
            .filter(|a| !a.is_empty())
            .collect();

        // Amount paid to each output address
        let mut outputs: BTreeMap<String, u64> = BTreeMap::new();
        for out in &raw.out {
            if let Some(addr) = out.addr.as_ref().filter(|a| !a.is_empty()) {
                let paid = outputs.entry(addr.clone()).or_insert(0);
                *paid = paid.saturating_add(out.value.unwrap_or(0));
            }
        }

        if inputs.iter().any(|a| same_address(a, subject)) {
            for (counterparty, paid) in outputs.into_iter().filter(|(a, _)| !same_address(a, subject)) {
                activity.transactions.push(Transaction {
                    hash: raw.hash.clone(),
                    counterparty,
                    direction: Direction::Sent,
                    value: Some(format_satoshi(paid)),
                    timestamp,
                });
            }
        } else {
            for counterparty in inputs.into_iter().filter(|a| !same_address(a, subject)) {
                activity.transactions.push(Transaction {
                    hash: raw.hash.clone(),
                    counterparty,
                    direction: Direction::Received,
                    value: None,
                    timestamp,
                });
            }
        }
    }

    if skipped > 0 {
        activity.warnings.push(
            AppError::upstream_malformed(format!(
                "Skipped {} malformed transaction record(s)",
                skipped
            ))
            .context("blockchain.info")
            .to_warning(),
        );
    }

    debug!(
        "📜 {} counterparty transfers for {} ({} skipped)",
        activity.transactions.len(),
        subject,
        skipped
    );
    activity
}

/// Base58 is case-sensitive, bech32 is not
fn same_address(a: &str, b: &str) -> bool {
    let is_bech32 = |s: &str| s.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("bc1"));
    if is_bech32(a) && is_bech32(b) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}
