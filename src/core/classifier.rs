//! Address Classifier
//!
//! Pure mapping from an address string (plus optional hint) to a chain tag.
//! Validation is separate: only malformed input is an error, an unknown chain
//! is a value ([`Chain::Unsupported`]) that flows through the scan.

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Chain, WalletAddress};
use crate::utils::constants::{is_bitcoin_hint, is_ethereum_hint};

const MIN_ADDRESS_LEN: usize = 14;
const MAX_ADDRESS_LEN: usize = 100;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Reject input that cannot be an address on any chain
pub fn validate_address(raw: &str) -> AppResult<&str> {
    let address = raw.trim();

    if address.is_empty() {
        return Err(AppError::invalid_address("Address is empty"));
    }
    if !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::invalid_address(
            "Address may only contain ASCII letters and digits",
        ));
    }
    if address.len() < MIN_ADDRESS_LEN || address.len() > MAX_ADDRESS_LEN {
        return Err(AppError::invalid_address(format!(
            "Address length {} outside {}..={}",
            address.len(),
            MIN_ADDRESS_LEN,
            MAX_ADDRESS_LEN
        )));
    }
    if has_hex_prefix(address) && !is_ethereum_address(address) {
        return Err(AppError::invalid_address(
            "0x-prefixed address must have exactly 40 hex digits",
        ));
    }

    Ok(address)
}

/// Classify an address by shape; the hint only names chains we cannot recognize.
/// Never fails.
pub fn classify_chain(address: &str, hint: Option<&str>) -> Chain {
    let address = address.trim();

    if is_ethereum_address(address) {
        return Chain::Ethereum;
    }
    if is_bech32_address(address) || is_base58_bitcoin_address(address) {
        return Chain::Bitcoin;
    }

    if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
        if !is_ethereum_hint(hint) && !is_bitcoin_hint(hint) {
            return Chain::Unsupported(hint.to_lowercase());
        }
    }

    if is_base58(address) && (32..=44).contains(&address.len()) {
        return Chain::Unsupported("solana".to_string());
    }

    Chain::Unsupported("unrecognized address format".to_string())
}

/// Validate then classify
pub fn parse_address(raw: &str, hint: Option<&str>) -> AppResult<WalletAddress> {
    let address = validate_address(raw)?;
    Ok(WalletAddress::new(address, classify_chain(address, hint)))
}

fn has_hex_prefix(address: &str) -> bool {
    address.starts_with("0x") || address.starts_with("0X")
}

fn is_ethereum_address(address: &str) -> bool {
    address.len() == 42
        && has_hex_prefix(address)
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn is_bech32_address(address: &str) -> bool {
    let lower = address.to_lowercase();
    // Mixed case is invalid bech32
    if address != lower && address != address.to_uppercase() {
        return false;
    }
    lower.starts_with("bc1")
        && (14..=74).contains(&lower.len())
        && lower[3..].chars().all(|c| BECH32_CHARSET.contains(c))
}

fn is_base58_bitcoin_address(address: &str) -> bool {
    (address.starts_with('1') || address.starts_with('3'))
        && (25..=35).contains(&address.len())
        && is_base58(address)
}

fn is_base58(address: &str) -> bool {
    address.chars().all(|c| BASE58_ALPHABET.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ethereum_address() {
        let chain = classify_chain("0x3f5CE5FBFe3E9af3971dD833D26bA9b5C936f0bE", None);
        assert_eq!(chain, Chain::Ethereum);
    }

    #[test]
    fn test_bitcoin_addresses() {
        assert_eq!(
            classify_chain("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", None),
            Chain::Bitcoin
        );
        assert_eq!(
            classify_chain("34xp4vRoCGJym3xR7yCVPFHoCNxv4Twseo", None),
            Chain::Bitcoin
        );
        assert_eq!(
            classify_chain("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", None),
            Chain::Bitcoin
        );
    }

    #[test]
    fn test_shape_wins_over_hint() {
        let chain = classify_chain("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", Some("ethereum"));
        assert_eq!(chain, Chain::Bitcoin);
    }

    #[test]
    fn test_solana_is_unsupported() {
        let chain = classify_chain("7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV", None);
        assert_eq!(chain, Chain::Unsupported("solana".to_string()));
    }

    #[test]
    fn test_hint_names_unsupported_chain() {
        let chain = classify_chain("TLa2f6VPqDgRE67v1736s7bJ8Ray5wYjU7", Some("Tron"));
        assert_eq!(chain, Chain::Unsupported("tron".to_string()));
    }

    #[test]
    fn test_unrecognized_shape() {
        let chain = classify_chain("cosmos1zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz0", None);
        assert_eq!(
            chain,
            Chain::Unsupported("unrecognized address format".to_string())
        );
    }

    #[test]
    fn test_validation_rejects_malformed_input() {
        assert!(validate_address("").is_err());
        assert!(validate_address("   ").is_err());
        assert!(validate_address("0x1234").is_err());
        assert!(validate_address("0xZZ5CE5FBFe3E9af3971dD833D26bA9b5C936f0bE").is_err());
        assert!(validate_address("1A1zP1eP5QGefi2DMPTf TL5SLmv7DivfNa").is_err());
        assert!(validate_address("'; DROP TABLE wallets;--").is_err());
    }

    #[test]
    fn test_validation_trims() {
        let address = validate_address("  0x3f5ce5fbfe3e9af3971dd833d26ba9b5c936f0be \n").unwrap();
        assert_eq!(address, "0x3f5ce5fbfe3e9af3971dd833d26ba9b5c936f0be");
    }

    #[test]
    fn test_parse_address_error_code() {
        let err = parse_address("0xnothex", None).unwrap_err();
        assert_eq!(err.code_str(), "ADDR_INVALID");
    }
}
