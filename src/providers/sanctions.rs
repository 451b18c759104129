//! Sanctions Oracle Client
//!
//! Calls `isSanctioned(address)` on the on-chain sanctions oracle through the
//! Etherscan proxy. Ethereum-family only.
//!
//! Fail-open: when the check cannot be completed the address is reported as
//! not sanctioned and the outcome carries a warning saying so.

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Chain, WalletAddress};
use crate::providers::etherscan::EtherscanClient;

sol! {
    function isSanctioned(address addr) external view returns (bool);
}

const ABI_WORD_LEN: usize = 32;

/// Result of screening one address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanctionsOutcome {
    pub sanctioned: bool,
    /// Set when the check could not be completed
    pub warning: Option<String>,
}

impl SanctionsOutcome {
    fn incomplete(err: AppError) -> Self {
        let err = err.context("Sanctions oracle");
        warn!("⚠️ {} - treating as not sanctioned", err);
        Self {
            sanctioned: false,
            warning: Some(format!(
                "{} - sanctions check not completed, treated as not sanctioned",
                err.to_warning()
            )),
        }
    }
}

#[derive(Clone)]
pub struct SanctionsOracle {
    client: EtherscanClient,
    oracle_address: String,
}

impl SanctionsOracle {
    /// `client` should carry the oracle timeout
    pub fn new(client: EtherscanClient, oracle_address: impl Into<String>) -> Self {
        Self {
            client,
            oracle_address: oracle_address.into(),
        }
    }

    pub fn oracle_address(&self) -> &str {
        &self.oracle_address
    }

    /// Strict check: any failure is an error
    pub async fn is_sanctioned(&self, address: &str) -> AppResult<bool> {
        let calldata = encode_call(address)?;
        let result = self.client.eth_call(&self.oracle_address, &calldata).await?;
        decode_oracle_result(&result)
    }

    /// Fail-open screening used by the scanner
    pub async fn screen(&self, subject: &WalletAddress) -> SanctionsOutcome {
        if *subject.chain() != Chain::Ethereum {
            return SanctionsOutcome::default();
        }

        match self.is_sanctioned(subject.as_str()).await {
            Ok(sanctioned) => {
                debug!("🛡️ Sanctions check for {}: {}", subject.as_str(), sanctioned);
                SanctionsOutcome {
                    sanctioned,
                    warning: None,
                }
            }
            Err(e) => SanctionsOutcome::incomplete(e),
        }
    }
}

/// ABI-encoded `isSanctioned(address)` calldata as 0x-prefixed hex
pub fn encode_call(address: &str) -> AppResult<String> {
    let addr = Address::from_str(address)
        .map_err(|e| AppError::invalid_address(format!("Not an Ethereum address: {}", e)))?;
    let calldata = isSanctionedCall { addr }.abi_encode();
    Ok(format!("0x{}", hex::encode(calldata)))
}

/// Decode the oracle's bool from the last byte of the returned word
pub fn decode_oracle_result(result: &str) -> AppResult<bool> {
    let raw = result.strip_prefix("0x").unwrap_or(result);
    let bytes = hex::decode(raw)
        .map_err(|e| AppError::oracle_malformed(format!("Result is not hex: {}", e)))?;

    if bytes.len() < ABI_WORD_LEN {
        return Err(AppError::oracle_malformed(format!(
            "Result has {} bytes, expected at least {}",
            bytes.len(),
            ABI_WORD_LEN
        )));
    }

    match bytes.last().copied() {
        Some(1) => Ok(true),
        Some(0) => Ok(false),
        Some(other) => Err(AppError::oracle_malformed(format!(
            "Unexpected boolean byte 0x{:02x}",
            other
        ))),
        None => Err(AppError::oracle_malformed("Empty result")),
    }
}
