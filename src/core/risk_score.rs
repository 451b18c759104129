//! Traceability Scoring Module
//!
//! Turns aggregated scan signals into a bounded 0-100 score estimating how
//! identifiable a wallet's owner is, with one explanation line per triggered rule.
//! - 0: appears anonymous
//! - 10-39: weak links
//! - 40-69: owner plausibly identifiable
//! - 70-100: owner likely known to at least one regulated party
//!
//! Rules are evaluated in a fixed order so the explanation trail is deterministic.
//! The mixer penalty lowers the score while `used_mixer` separately raises risk.

use serde::{Deserialize, Serialize};

use crate::models::types::{RiskLevel, ScanResult};

/// Points per distinct exchange
const POINTS_PER_EXCHANGE: i32 = 15;
/// Cap on the distinct-exchange contribution
const MAX_EXCHANGE_POINTS: i32 = 45;
const DEPOSIT_POINTS: i32 = 15;
const MIXER_PENALTY: i32 = -10;
const SANCTIONS_POINTS: i32 = 20;
const HIGH_ACTIVITY_TX_COUNT: u64 = 100;
const HIGH_ACTIVITY_POINTS: i32 = 5;
const LARGE_FOOTPRINT_COUNTERPARTIES: usize = 50;
const LARGE_FOOTPRINT_POINTS: i32 = 5;

pub const ANONYMOUS_DETAIL: &str = "No exchange interactions detected - wallet appears anonymous";

/// One triggered rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContribution {
    /// Signed points added by this rule (0 for the anonymous note)
    pub points: i32,
    pub reason: String,
}

/// Bounded traceability score with its explanation trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceabilityScore {
    /// Clamped to 0..=100
    pub total: u8,
    /// In rule-evaluation order
    pub contributions: Vec<ScoreContribution>,
}

impl TraceabilityScore {
    /// Score a scan result. Pure: identical input gives identical output.
    pub fn evaluate(result: &ScanResult, sanctioned: bool) -> Self {
        TraceabilityScoreBuilder::new()
            .with_exchanges(&result.exchanges_detected)
            .with_interaction_volume(result.exchange_interactions.len())
            .with_deposits(result.deposit_count())
            .with_mixer(result.used_mixer)
            .with_sanctions(sanctioned)
            .with_activity(result.tx_count)
            .with_counterparties(result.counterparties)
            .build()
    }

    /// Explanation lines in order
    pub fn details(&self) -> Vec<String> {
        self.contributions.iter().map(|c| c.reason.clone()).collect()
    }

    /// Sum before clamping
    pub fn raw_total(&self) -> i32 {
        self.contributions.iter().map(|c| c.points).sum()
    }
}

/// Builder applying scoring rules one signal at a time.
/// Call order is the explanation order; [`TraceabilityScore::evaluate`] fixes it.
pub struct TraceabilityScoreBuilder {
    contributions: Vec<ScoreContribution>,
}

impl TraceabilityScoreBuilder {
    pub fn new() -> Self {
        Self {
            contributions: Vec::new(),
        }
    }

    fn push(&mut self, points: i32, reason: String) {
        self.contributions.push(ScoreContribution { points, reason });
    }

    /// +15 per distinct exchange, capped at +45
    pub fn with_exchanges(mut self, exchanges: &[String]) -> Self {
        if !exchanges.is_empty() {
            let points = (exchanges.len() as i32)
                .saturating_mul(POINTS_PER_EXCHANGE)
                .min(MAX_EXCHANGE_POINTS);
            self.push(
                points,
                format!(
                    "Interacted with {} exchange(s): {} (+{})",
                    exchanges.len(),
                    exchanges.join(", "),
                    points
                ),
            );
        }
        self
    }

    /// Interaction-count tier, highest tier wins
    pub fn with_interaction_volume(mut self, interactions: usize) -> Self {
        match interactions {
            n if n >= 10 => self.push(15, format!("{} exchange transactions detected (+15)", n)),
            n if n >= 3 => self.push(10, format!("{} exchange transactions detected (+10)", n)),
            n if n >= 1 => self.push(5, format!("{} exchange transaction(s) detected (+5)", n)),
            _ => {}
        }
        self
    }

    /// Any deposit to a known exchange is a KYC link
    pub fn with_deposits(mut self, deposits: usize) -> Self {
        if deposits > 0 {
            self.push(
                DEPOSIT_POINTS,
                format!(
                    "Deposited to exchange {} time(s) - KYC link likely (+{})",
                    deposits, DEPOSIT_POINTS
                ),
            );
        }
        self
    }

    pub fn with_mixer(mut self, used_mixer: bool) -> Self {
        if used_mixer {
            self.push(
                MIXER_PENALTY,
                format!(
                    "Used a mixing service - reduced traceability but flagged ({})",
                    MIXER_PENALTY
                ),
            );
        }
        self
    }

    pub fn with_sanctions(mut self, sanctioned: bool) -> Self {
        if sanctioned {
            self.push(
                SANCTIONS_POINTS,
                format!(
                    "Address is sanctioned - identity known to authorities (+{})",
                    SANCTIONS_POINTS
                ),
            );
        }
        self
    }

    pub fn with_activity(mut self, tx_count: u64) -> Self {
        if tx_count >= HIGH_ACTIVITY_TX_COUNT {
            self.push(
                HIGH_ACTIVITY_POINTS,
                format!(
                    "High activity ({} txs) - more data points (+{})",
                    tx_count, HIGH_ACTIVITY_POINTS
                ),
            );
        }
        self
    }

    pub fn with_counterparties(mut self, counterparties: usize) -> Self {
        if counterparties >= LARGE_FOOTPRINT_COUNTERPARTIES {
            self.push(
                LARGE_FOOTPRINT_POINTS,
                format!(
                    "{} unique counterparties - large footprint (+{})",
                    counterparties, LARGE_FOOTPRINT_POINTS
                ),
            );
        }
        self
    }

    /// Clamp and close the trail
    pub fn build(mut self) -> TraceabilityScore {
        let raw: i32 = self.contributions.iter().map(|c| c.points).sum();
        let total = raw.clamp(0, 100) as u8;

        if total == 0 {
            self.push(0, ANONYMOUS_DETAIL.to_string());
        }

        TraceabilityScore {
            total,
            contributions: self.contributions,
        }
    }
}

impl Default for TraceabilityScoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decision table, first match wins
pub fn classify_risk(score: u8, sanctioned: bool, used_mixer: bool) -> RiskLevel {
    if sanctioned {
        return RiskLevel::Critical;
    }
    if used_mixer && score >= 50 {
        return RiskLevel::High;
    }
    match score {
        70..=u8::MAX => RiskLevel::High,
        40..=69 => RiskLevel::Medium,
        10..=39 => RiskLevel::Low,
        _ => RiskLevel::Safe,
    }
}
