//! Type definitions for the wallet deep scan
//! All core data structures flowing from chain adapters to the final result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::utils::constants::{format_timestamp, TRACEABLE_THRESHOLD};

/// Chain family an address belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Ethereum-family (0x-prefixed hex accounts)
    Ethereum,
    /// Bitcoin-family (base58 / bech32 outputs)
    Bitcoin,
    /// Recognized shape or hint we do not scan; carries the reason
    Unsupported(String),
}

impl Chain {
    pub fn as_str(&self) -> &str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Bitcoin => "bitcoin",
            Chain::Unsupported(reason) => reason.as_str(),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Unsupported(reason) => write!(f, "unsupported ({})", reason),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Subject address of a scan. Immutable, created per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAddress {
    raw: String,
    chain: Chain,
}

impl WalletAddress {
    pub fn new(raw: impl Into<String>, chain: Chain) -> Self {
        Self {
            raw: raw.into(),
            chain,
        }
    }

    /// Address exactly as supplied (trimmed)
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Lower-cased form used for registry lookups and direction tests on EVM
    pub fn normalized(&self) -> String {
        self.raw.to_lowercase()
    }
}

/// Direction of a transaction relative to the scanned address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction seen from the subject's side. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub hash: String,
    /// Address on the other side (empty when the provider gave none)
    pub counterparty: String,
    pub direction: Direction,
    /// Rendered value with unit, when known
    pub value: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Normalized output of a chain adapter
#[derive(Debug, Clone, Default)]
pub struct ChainActivity {
    /// Rendered balance with unit; None when the balance fetch failed
    pub balance: Option<String>,
    pub tx_count: u64,
    pub transactions: Vec<Transaction>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub warnings: Vec<String>,
}

/// One matched transaction against a known exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeInteraction {
    pub exchange: String,
    pub address: String,
    pub direction: Direction,
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Ordinal risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// No meaningful identity-linking signal
    Safe,
    /// Weak signals
    Low,
    /// Owner plausibly identifiable
    Medium,
    /// Owner likely identifiable, or mixer use on a traceable wallet
    High,
    /// Sanctioned address
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "✅",
            RiskLevel::Low => "🟡",
            RiskLevel::Medium => "🟠",
            RiskLevel::High => "🔴",
            RiskLevel::Critical => "💀",
        }
    }
}

/// Final result of a deep scan, handed to the caller and not retained
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub address: String,
    pub chain: Chain,
    pub balance: Option<String>,
    pub tx_count: u64,
    pub exchange_interactions: Vec<ExchangeInteraction>,
    /// Deduplicated, lexicographically sorted
    pub exchanges_detected: Vec<String>,
    pub mixer_interactions: Vec<String>,
    pub used_mixer: bool,
    pub counterparties: usize,
    pub first_tx_date: Option<String>,
    pub last_tx_date: Option<String>,
    pub sanctioned: bool,
    /// Subject address itself is a known exchange wallet
    pub labeled: bool,
    pub label: Option<String>,
    pub warnings: Vec<String>,
    pub traceability_score: u8,
    pub traceability_details: Vec<String>,
    pub is_traceable: bool,
    pub risk_level: RiskLevel,
    pub scanned_at: DateTime<Utc>,
    pub latency_ms: u64,
}

impl ScanResult {
    /// Empty result for an address; signals and score are filled in by the scanner
    pub fn empty(address: &WalletAddress) -> Self {
        Self {
            address: address.as_str().to_string(),
            chain: address.chain().clone(),
            balance: None,
            tx_count: 0,
            exchange_interactions: Vec::new(),
            exchanges_detected: Vec::new(),
            mixer_interactions: Vec::new(),
            used_mixer: false,
            counterparties: 0,
            first_tx_date: None,
            last_tx_date: None,
            sanctioned: false,
            labeled: false,
            label: None,
            warnings: Vec::new(),
            traceability_score: 0,
            traceability_details: Vec::new(),
            is_traceable: false,
            risk_level: RiskLevel::Safe,
            scanned_at: Utc::now(),
            latency_ms: 0,
        }
    }

    /// Copy adapter output into the result
    pub fn apply_activity(&mut self, activity: ChainActivity) {
        self.balance = activity.balance;
        self.tx_count = activity.tx_count;
        self.first_tx_date = activity.first_seen.as_ref().map(format_timestamp);
        self.last_tx_date = activity.last_seen.as_ref().map(format_timestamp);
        self.warnings.extend(activity.warnings);
    }

    /// Record score, explanation trail and risk level
    pub fn apply_score(&mut self, score: u8, details: Vec<String>, risk_level: RiskLevel) {
        self.traceability_score = score;
        self.traceability_details = details;
        self.is_traceable = score >= TRACEABLE_THRESHOLD;
        self.risk_level = risk_level;
    }

    /// Number of interactions where the subject paid an exchange
    pub fn deposit_count(&self) -> usize {
        self.exchange_interactions
            .iter()
            .filter(|i| i.direction == Direction::Sent)
            .count()
    }

    /// Set the scan latency
    pub fn set_latency(&mut self, start: Instant) {
        self.latency_ms = start.elapsed().as_millis() as u64;
    }

    /// Pretty print the scan result
    pub fn summary(&self) -> String {
        let mut output = format!(
            "\n{} Risk: {} | Traceability: {}/100 | {} ({})\n",
            self.risk_level.emoji(),
            self.risk_level.as_str(),
            self.traceability_score,
            self.address,
            self.chain
        );
        output.push_str(&format!(
            "   Balance: {}\n",
            self.balance.as_deref().unwrap_or("unknown")
        ));
        output.push_str(&format!(
            "   Transactions: {} | Counterparties: {}\n",
            self.tx_count, self.counterparties
        ));
        if let (Some(first), Some(last)) = (&self.first_tx_date, &self.last_tx_date) {
            output.push_str(&format!("   Active: {} → {}\n", first, last));
        }
        if let Some(label) = &self.label {
            output.push_str(&format!("   Label: {}\n", label));
        }
        if !self.exchanges_detected.is_empty() {
            output.push_str(&format!(
                "   Exchanges: {} ({} interactions)\n",
                self.exchanges_detected.join(", "),
                self.exchange_interactions.len()
            ));
        }
        if self.used_mixer {
            output.push_str("   Mixer activity:\n");
            for mixer in &self.mixer_interactions {
                output.push_str(&format!("     - {}\n", mixer));
            }
        }
        if self.sanctioned {
            output.push_str("   🚨 SANCTIONED ADDRESS\n");
        }

        output.push_str("   Score breakdown:\n");
        for detail in &self.traceability_details {
            output.push_str(&format!("     - {}\n", detail));
        }

        if !self.warnings.is_empty() {
            output.push_str("   Warnings:\n");
            for warning in &self.warnings {
                output.push_str(&format!("     ⚠️ {}\n", warning));
            }
        }
        output.push_str(&format!("   Latency: {}ms\n", self.latency_ms));

        output
    }
}
