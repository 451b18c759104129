//! Registry Matcher
//!
//! Exact, case-insensitive lookups of counterparties against the compiled-in
//! exchange and mixer registries. Tables are built once and only read afterwards.
//!
//! No fuzzy or prefix matching: an unlisted deposit address of a known exchange
//! is simply not detected.

use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::types::{Chain, ExchangeInteraction, Transaction};
use crate::utils::constants::{
    format_timestamp, KNOWN_EXCHANGES_BTC, KNOWN_EXCHANGES_ETH, KNOWN_MIXERS_ETH,
};

/// Characters of the tx hash kept in mixer descriptions
const MIXER_HASH_PREFIX_LEN: usize = 16;

lazy_static! {
    static ref EXCHANGES_ETH: HashMap<String, &'static str> = build_table(KNOWN_EXCHANGES_ETH);
    static ref EXCHANGES_BTC: HashMap<String, &'static str> = build_table(KNOWN_EXCHANGES_BTC);
    static ref MIXERS_ETH: HashMap<String, &'static str> = build_table(KNOWN_MIXERS_ETH);
}

fn build_table(entries: &'static [(&'static str, &'static str)]) -> HashMap<String, &'static str> {
    entries
        .iter()
        .map(|(address, label)| (address.to_lowercase(), *label))
        .collect()
}

/// Exchange label for an address on the given chain
pub fn exchange_label(chain: &Chain, address: &str) -> Option<&'static str> {
    let table: &HashMap<String, &'static str> = match chain {
        Chain::Ethereum => &*EXCHANGES_ETH,
        Chain::Bitcoin => &*EXCHANGES_BTC,
        Chain::Unsupported(_) => return None,
    };
    table.get(&address.to_lowercase()).copied()
}

/// Mixer label for an address (Ethereum-family only)
pub fn mixer_label(chain: &Chain, address: &str) -> Option<&'static str> {
    match chain {
        Chain::Ethereum => MIXERS_ETH.get(&address.to_lowercase()).copied(),
        _ => None,
    }
}

/// Everything the registries revealed about a transaction history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryMatches {
    pub exchange_interactions: Vec<ExchangeInteraction>,
    /// Sorted, deduplicated exchange labels
    pub exchanges_detected: Vec<String>,
    pub mixer_interactions: Vec<String>,
    pub used_mixer: bool,
    /// Distinct non-empty counterparties
    pub counterparties: usize,
}

/// Cross-reference every counterparty against both registries
pub fn match_transactions(chain: &Chain, transactions: &[Transaction]) -> RegistryMatches {
    let mut matches = RegistryMatches::default();
    let mut detected: BTreeSet<String> = BTreeSet::new();
    let mut counterparties: HashSet<String> = HashSet::new();

    for tx in transactions {
        if tx.counterparty.is_empty() {
            continue;
        }
        let counterparty = tx.counterparty.to_lowercase();

        if let Some(exchange) = exchange_label(chain, &counterparty) {
            detected.insert(exchange.to_string());
            matches.exchange_interactions.push(ExchangeInteraction {
                exchange: exchange.to_string(),
                address: tx.counterparty.clone(),
                direction: tx.direction,
                tx_hash: tx.hash.clone(),
                value: tx.value.clone(),
                timestamp: tx.timestamp.as_ref().map(format_timestamp),
            });
        }

        if let Some(mixer) = mixer_label(chain, &counterparty) {
            matches.mixer_interactions.push(describe_mixer_interaction(tx, mixer));
        }

        counterparties.insert(counterparty);
    }

    matches.used_mixer = !matches.mixer_interactions.is_empty();
    matches.exchanges_detected = detected.into_iter().collect();
    matches.counterparties = counterparties.len();
    matches
}

fn describe_mixer_interaction(tx: &Transaction, mixer: &str) -> String {
    let hash_prefix = tx.hash.get(..MIXER_HASH_PREFIX_LEN).unwrap_or(&tx.hash);
    format!("{} via {} (tx: {}...)", tx.direction, mixer, hash_prefix)
}
