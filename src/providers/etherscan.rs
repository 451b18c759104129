//! Etherscan Provider - Ethereum-family chain adapter
//!
//! Balance and transaction history from an Etherscan-compatible account API,
//! plus read-only contract calls through its `proxy` module.
//!
//! Balance and txlist are independent and fetched concurrently; a failure in
//! either becomes a warning on the returned [`ChainActivity`].

use alloy_primitives::U256;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{ChainActivity, Direction, Transaction, WalletAddress};
use crate::providers::http::HttpFetcher;
use crate::utils::constants::{format_wei, timestamp_from_secs, ETHERSCAN_END_BLOCK};

const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

/// Account/proxy API envelope. `status` and `message` are absent on proxy calls.
#[derive(Debug, Deserialize)]
struct EtherscanEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcError>,
}

impl EtherscanEnvelope {
    fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("1")
    }

    /// Best description of a rejected call
    fn rejection(&self) -> String {
        let message = self.message.as_deref().unwrap_or("NOTOK");
        match self.result.as_str() {
            Some(detail) if !detail.is_empty() => format!("{} ({})", message, detail),
            _ => message.to_string(),
        }
    }
}

/// JSON-RPC error returned by the proxy module
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// Raw `txlist` record
#[derive(Debug, Deserialize)]
struct EtherscanTx {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default, rename = "contractAddress")]
    contract_address: String,
    #[serde(default)]
    value: String,
    #[serde(default, rename = "timeStamp")]
    time_stamp: String,
}

/// Normalized transaction list
#[derive(Debug, Clone, Default)]
pub struct ParsedTransactions {
    pub transactions: Vec<Transaction>,
    /// Records returned by the provider, including skipped ones
    pub returned: u64,
    pub skipped: usize,
}

/// Etherscan-compatible client
#[derive(Clone)]
pub struct EtherscanClient {
    base_url: String,
    api_key: Option<String>,
    fetcher: HttpFetcher,
    tx_cap: u32,
}

impl EtherscanClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        fetcher: HttpFetcher,
        tx_cap: u32,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            fetcher,
            tx_cap,
        }
    }

    fn query(&self, params: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut query = params.to_vec();
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }
        query
    }

    async fn get(&self, params: &[(&'static str, String)]) -> AppResult<EtherscanEnvelope> {
        self.fetcher.get_json(&self.base_url, &self.query(params)).await
    }

    /// Balance rendered as `"x.xxxxxx ETH"`
    pub async fn fetch_balance(&self, address: &str) -> AppResult<String> {
        let envelope = self
            .get(&[
                ("module", "account".to_string()),
                ("action", "balance".to_string()),
                ("address", address.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?;

        if !envelope.is_ok() {
            return Err(AppError::upstream_unavailable(envelope.rejection()));
        }

        let wei = envelope
            .result
            .as_str()
            .and_then(|raw| raw.parse::<U256>().ok())
            .ok_or_else(|| AppError::upstream_malformed("Balance is not an integer"))?;

        Ok(format_wei(wei))
    }

    /// Normal transactions, oldest first, up to the configured cap
    pub async fn fetch_transactions(&self, subject: &str) -> AppResult<ParsedTransactions> {
        let envelope = self
            .get(&[
                ("module", "account".to_string()),
                ("action", "txlist".to_string()),
                ("address", subject.to_string()),
                ("startblock", "0".to_string()),
                ("endblock", ETHERSCAN_END_BLOCK.to_string()),
                ("page", "1".to_string()),
                ("offset", self.tx_cap.to_string()),
                ("sort", "asc".to_string()),
            ])
            .await?;

        if !envelope.is_ok() {
            if envelope.message.as_deref() == Some(NO_TRANSACTIONS_MESSAGE) {
                return Ok(ParsedTransactions::default());
            }
            return Err(AppError::upstream_unavailable(envelope.rejection()));
        }

        match envelope.result {
            Value::Array(records) => Ok(parse_transactions(subject, records)),
            _ => Err(AppError::upstream_malformed("Transaction list is not an array")),
        }
    }

    /// Balance and history for one address, fetched concurrently
    pub async fn fetch_activity(&self, subject: &WalletAddress) -> ChainActivity {
        let address = subject.normalized();
        let (balance, transactions) = tokio::join!(
            self.fetch_balance(&address),
            self.fetch_transactions(&address)
        );

        let mut activity = ChainActivity::default();

        match balance {
            Ok(balance) => activity.balance = Some(balance),
            Err(e) => {
                let e = e.context("Etherscan balance");
                warn!("⚠️ {}", e);
                activity.warnings.push(e.to_warning());
            }
        }

        match transactions {
            Ok(parsed) => {
                debug!(
                    "📜 {} transactions for {} ({} skipped)",
                    parsed.returned, address, parsed.skipped
                );
                if parsed.skipped > 0 {
                    activity.warnings.push(
                        AppError::upstream_malformed(format!(
                            "Skipped {} malformed transaction record(s)",
                            parsed.skipped
                        ))
                        .context("Etherscan txlist")
                        .to_warning(),
                    );
                }
                activity.tx_count = parsed.returned;
                activity.first_seen = parsed.transactions.iter().filter_map(|t| t.timestamp).min();
                activity.last_seen = parsed.transactions.iter().filter_map(|t| t.timestamp).max();
                activity.transactions = parsed.transactions;
            }
            Err(e) => {
                let e = e.context("Etherscan txlist");
                warn!("⚠️ {}", e);
                activity.warnings.push(e.to_warning());
            }
        }

        activity
    }

    /// Read-only contract call at the latest block, returns the hex result
    pub async fn eth_call(&self, to: &str, data: &str) -> AppResult<String> {
        let envelope = self
            .get(&[
                ("module", "proxy".to_string()),
                ("action", "eth_call".to_string()),
                ("to", to.to_string()),
                ("data", data.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?;

        if let Some(error) = envelope.error {
            return Err(AppError::new(
                ErrorCode::UpstreamUnavailable,
                format!("RPC error: {} (code: {})", error.message, error.code),
            ));
        }

        match envelope.result.as_str() {
            Some(hex) if hex.starts_with("0x") => Ok(hex.to_string()),
            Some(other) if !other.is_empty() => {
                Err(AppError::upstream_unavailable(format!("eth_call rejected: {}", other)))
            }
            _ => Err(AppError::upstream_malformed("No result in eth_call response")),
        }
    }
}

/// Normalize raw `txlist` records relative to `subject`.
/// Malformed records are counted in `skipped`, never fatal.
pub fn parse_transactions(subject: &str, records: Vec<Value>) -> ParsedTransactions {
    let subject = subject.to_lowercase();
    let returned = records.len() as u64;
    let mut skipped = 0;
    let mut transactions = Vec::with_capacity(records.len());

    for record in records {
        match serde_json::from_value::<EtherscanTx>(record)
            .ok()
            .and_then(|raw| normalize(&subject, raw))
        {
            Some(tx) => transactions.push(tx),
            None => skipped += 1,
        }
    }

    transactions.sort_by_key(|tx| tx.timestamp);

    ParsedTransactions {
        transactions,
        returned,
        skipped,
    }
}

fn normalize(subject: &str, raw: EtherscanTx) -> Option<Transaction> {
    if raw.hash.is_empty() || raw.from.is_empty() {
        return None;
    }

    let value = if raw.value.is_empty() {
        U256::ZERO
    } else {
        raw.value.parse::<U256>().ok()?
    };

    let timestamp = if raw.time_stamp.is_empty() {
        None
    } else {
        Some(timestamp_from_secs(raw.time_stamp.parse::<i64>().ok()?)?)
    };

    let from = raw.from.to_lowercase();
    let (counterparty, direction) = if from == subject {
        let to = if raw.to.is_empty() {
            raw.contract_address
        } else {
            raw.to
        };
        (to.to_lowercase(), Direction::Sent)
    } else {
        (from, Direction::Received)
    };

    Some(Transaction {
        hash: raw.hash,
        counterparty,
        direction,
        value: Some(format_wei(value)),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SUBJECT: &str = "0xAbC0000000000000000000000000000000000001";
    const BINANCE: &str = "0x3f5ce5fbfe3e9af3971dd833d26ba9b5c936f0be";

    #[test]
    fn test_direction_and_counterparty() {
        let records = vec![
            json!({"hash": "0x01", "from": SUBJECT, "to": BINANCE, "value": "1000000000000000000", "timeStamp": "1700000000"}),
            json!({"hash": "0x02", "from": BINANCE, "to": SUBJECT, "value": "500000000000000000", "timeStamp": "1700000600"}),
        ];

        let parsed = parse_transactions(SUBJECT, records);
        assert_eq!(parsed.returned, 2);
        assert_eq!(parsed.skipped, 0);

        let sent = &parsed.transactions[0];
        assert_eq!(sent.direction, Direction::Sent);
        assert_eq!(sent.counterparty, BINANCE);
        assert_eq!(sent.value.as_deref(), Some("1.000000 ETH"));

        let received = &parsed.transactions[1];
        assert_eq!(received.direction, Direction::Received);
        assert_eq!(received.counterparty, BINANCE);
        assert_eq!(received.value.as_deref(), Some("0.500000 ETH"));
    }

    #[test]
    fn test_contract_creation_uses_contract_address() {
        let records = vec![json!({
            "hash": "0x03", "from": SUBJECT, "to": "",
            "contractAddress": "0xC0ffee0000000000000000000000000000000000",
            "value": "0", "timeStamp": "1700000000"
        })];

        let parsed = parse_transactions(SUBJECT, records);
        assert_eq!(
            parsed.transactions[0].counterparty,
            "0xc0ffee0000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let records = vec![
            json!({"hash": "", "from": SUBJECT, "to": BINANCE, "value": "1", "timeStamp": "1"}),
            json!({"hash": "0x05", "from": SUBJECT, "to": BINANCE, "value": "lots", "timeStamp": "1"}),
            json!({"hash": "0x06", "from": SUBJECT, "to": BINANCE, "value": "1", "timeStamp": "yesterday"}),
            json!("not an object"),
            json!({"hash": "0x07", "from": SUBJECT, "to": BINANCE, "value": "1", "timeStamp": "1"}),
        ];

        let parsed = parse_transactions(SUBJECT, records);
        assert_eq!(parsed.returned, 5);
        assert_eq!(parsed.skipped, 4);
        assert_eq!(parsed.transactions.len(), 1);
    }

    #[test]
    fn test_sorted_oldest_first() {
        let records = vec![
            json!({"hash": "0x09", "from": BINANCE, "to": SUBJECT, "value": "1", "timeStamp": "1700000900"}),
            json!({"hash": "0x08", "from": BINANCE, "to": SUBJECT, "value": "1", "timeStamp": "1700000100"}),
        ];
        let parsed = parse_transactions(SUBJECT, records);
        assert_eq!(parsed.transactions[0].hash, "0x08");
        assert_eq!(parsed.transactions[1].hash, "0x09");
    }

    #[test]
    fn test_envelope_rejection() {
        let envelope: EtherscanEnvelope = serde_json::from_value(json!({
            "status": "0", "message": "NOTOK", "result": "Max rate limit reached"
        }))
        .unwrap();
        assert!(!envelope.is_ok());
        assert_eq!(envelope.rejection(), "NOTOK (Max rate limit reached)");
    }

    #[test]
    fn test_proxy_envelope() {
        let envelope: EtherscanEnvelope = serde_json::from_value(json!({
            "jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "execution reverted"}
        }))
        .unwrap();
        assert!(envelope.status.is_none());
        assert_eq!(envelope.error.unwrap().code, -32000);
    }

    // ============================================
    // Against a mock provider
    // ============================================

    async fn mock_action(server: &MockServer, action: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("action", action))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> EtherscanClient {
        let fetcher = HttpFetcher::new(std::time::Duration::from_secs(5)).unwrap();
        EtherscanClient::new(format!("{}/api", server.uri()), Some("KEY".to_string()), fetcher, 100)
    }

    fn eth_subject() -> WalletAddress {
        WalletAddress::new(SUBJECT, crate::models::types::Chain::Ethereum)
    }

    #[tokio::test]
    async fn test_fetch_activity_from_provider() {
        let server = MockServer::start().await;
        mock_action(
            &server,
            "balance",
            json!({"status": "1", "message": "OK", "result": "1500000000000000000"}),
        )
        .await;
        mock_action(
            &server,
            "txlist",
            json!({"status": "1", "message": "OK", "result": [
                {"hash": "0x0b", "from": BINANCE, "to": SUBJECT, "value": "2000000000000000000", "timeStamp": "1700000600"},
                {"hash": "0x0a", "from": SUBJECT, "to": BINANCE, "value": "1000000000000000000", "timeStamp": "1700000000"}
            ]}),
        )
        .await;

        let activity = client_for(&server).fetch_activity(&eth_subject()).await;
        assert!(activity.warnings.is_empty(), "{:?}", activity.warnings);
        assert_eq!(activity.balance.as_deref(), Some("1.500000 ETH"));
        assert_eq!(activity.tx_count, 2);
        assert_eq!(activity.transactions[0].hash, "0x0a");
        assert_eq!(activity.transactions[0].direction, Direction::Sent);
        assert_eq!(activity.transactions[1].direction, Direction::Received);
        assert!(activity.first_seen.unwrap() < activity.last_seen.unwrap());
    }

    #[tokio::test]
    async fn test_no_transactions_is_empty_history() {
        let server = MockServer::start().await;
        mock_action(&server, "balance", json!({"status": "1", "message": "OK", "result": "0"})).await;
        mock_action(
            &server,
            "txlist",
            json!({"status": "0", "message": "No transactions found", "result": []}),
        )
        .await;

        let activity = client_for(&server).fetch_activity(&eth_subject()).await;
        assert!(activity.warnings.is_empty(), "{:?}", activity.warnings);
        assert_eq!(activity.balance.as_deref(), Some("0.000000 ETH"));
        assert_eq!(activity.tx_count, 0);
        assert!(activity.transactions.is_empty());
        assert!(activity.first_seen.is_none());
    }

    #[tokio::test]
    async fn test_rate_limited_calls_become_warnings() {
        let server = MockServer::start().await;
        let rejected = json!({"status": "0", "message": "NOTOK", "result": "Max rate limit reached"});
        mock_action(&server, "balance", rejected.clone()).await;
        mock_action(&server, "txlist", rejected).await;

        let activity = client_for(&server).fetch_activity(&eth_subject()).await;
        assert!(activity.balance.is_none());
        assert_eq!(activity.tx_count, 0);
        assert_eq!(
            activity.warnings,
            vec![
                "[UPSTREAM_UNAVAILABLE] Etherscan balance: NOTOK (Max rate limit reached)",
                "[UPSTREAM_UNAVAILABLE] Etherscan txlist: NOTOK (Max rate limit reached)",
            ]
        );
    }

    #[tokio::test]
    async fn test_http_error_status_becomes_warning() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let activity = client_for(&server).fetch_activity(&eth_subject()).await;
        assert_eq!(activity.warnings.len(), 2);
        assert!(activity
            .warnings
            .iter()
            .all(|w| w.starts_with("[UPSTREAM_HTTP_STATUS]") && w.contains("HTTP error: 503")));
    }

    #[tokio::test]
    async fn test_eth_call_result_and_rpc_error() {
        let server = MockServer::start().await;
        let word = format!("0x{}1", "0".repeat(63));
        Mock::given(method("GET"))
            .and(query_param("action", "eth_call"))
            .and(query_param("to", "0xoracle"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": word})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "eth_call"))
            .and(query_param("to", "0xbroken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1,
                "error": {"code": -32000, "message": "execution reverted"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.eth_call("0xoracle", "0xdf592f7d").await.unwrap(), word);

        let err = client.eth_call("0xbroken", "0xdf592f7d").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamUnavailable);
        assert!(err.message.contains("execution reverted"));
    }

    #[tokio::test]
    async fn test_unreachable_provider_degrades_to_warnings() {
        let fetcher = HttpFetcher::new(std::time::Duration::from_millis(500)).unwrap();
        let client = EtherscanClient::new("http://127.0.0.1:9/api", None, fetcher, 100);
        let subject = WalletAddress::new(SUBJECT, crate::models::types::Chain::Ethereum);

        let activity = client.fetch_activity(&subject).await;
        assert!(activity.balance.is_none());
        assert_eq!(activity.tx_count, 0);
        assert_eq!(activity.warnings.len(), 2);
        assert!(activity.warnings[0].contains("Etherscan balance"));
        assert!(activity.warnings[1].contains("Etherscan txlist"));
    }
}
