//! Integration tests for the wallet deep-scan engine
//! No network access: assembly is tested directly, scans target an unreachable upstream.

use serde_json::json;
use std::time::Duration;
use wallet_trace::{
    core::scanner::assemble,
    providers::SanctionsOutcome,
    ChainActivity, Chain, Direction, RiskLevel, ScanConfig, TraceabilityScore, Transaction,
    WalletAddress, WalletScanner,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUBJECT: &str = "0x00000000000000000000000000000000000000a1";
const BINANCE: &str = "0x3f5ce5fbfe3e9af3971dd833d26ba9b5c936f0be";
const COINBASE: &str = "0x71660c4005ba85c37ccec55d0c4493e66fe775d3";
const KRAKEN: &str = "0x267be1c1d684f78cb4f6a176c4911b741e4ffdc0";
const TORNADO_ROUTER: &str = "0x722122df12d4e14e13ac3b6895a86e84145b6967";
const ANONYMOUS: &str = "No exchange interactions detected - wallet appears anonymous";

fn subject() -> WalletAddress {
    WalletAddress::new(SUBJECT, Chain::Ethereum)
}

fn tx(hash: &str, counterparty: &str, direction: Direction) -> Transaction {
    Transaction {
        hash: hash.to_string(),
        counterparty: counterparty.to_string(),
        direction,
        value: Some("0.100000 ETH".to_string()),
        timestamp: None,
    }
}

fn activity(transactions: Vec<Transaction>) -> ChainActivity {
    ChainActivity {
        balance: Some("0.000000 ETH".to_string()),
        tx_count: transactions.len() as u64,
        transactions,
        ..ChainActivity::default()
    }
}

fn offline_config() -> ScanConfig {
    ScanConfig {
        etherscan_base_url: "http://127.0.0.1:9/api".to_string(),
        blockchain_info_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout: Duration::from_millis(500),
        oracle_timeout: Duration::from_millis(500),
        ..ScanConfig::default()
    }
}

// ============================================
// Scenarios
// ============================================

#[test]
fn test_two_deposits_to_binance() {
    let result = assemble(
        &subject(),
        activity(vec![
            tx("0x01", BINANCE, Direction::Sent),
            tx("0x02", BINANCE, Direction::Sent),
        ]),
        SanctionsOutcome::default(),
    );

    assert_eq!(result.exchanges_detected, vec!["Binance"]);
    assert_eq!(result.counterparties, 1);
    assert_eq!(result.traceability_score, 35);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(
        result.traceability_details,
        vec![
            "Interacted with 1 exchange(s): Binance (+15)",
            "2 exchange transaction(s) detected (+5)",
            "Deposited to exchange 2 time(s) - KYC link likely (+15)",
        ]
    );
}

#[test]
fn test_single_mixer_interaction() {
    let result = assemble(
        &subject(),
        activity(vec![tx("0xdeadbeefdeadbeefdeadbeef", TORNADO_ROUTER, Direction::Sent)]),
        SanctionsOutcome::default(),
    );

    assert!(result.used_mixer);
    assert_eq!(result.traceability_score, 0);
    assert_eq!(result.risk_level, RiskLevel::Safe);
    assert_eq!(
        result.mixer_interactions,
        vec!["sent via Tornado Cash Router (tx: 0xdeadbeefdeadbe...)"]
    );
    assert_eq!(result.traceability_details.last().map(String::as_str), Some(ANONYMOUS));
}

#[test]
fn test_sanctioned_without_other_signals() {
    let result = assemble(
        &subject(),
        ChainActivity::default(),
        SanctionsOutcome {
            sanctioned: true,
            warning: None,
        },
    );

    assert!(result.sanctioned);
    assert_eq!(result.traceability_score, 20);
    assert_eq!(result.risk_level, RiskLevel::Critical);
}

#[tokio::test]
async fn test_unsupported_chain_scan() {
    let scanner = WalletScanner::new(&offline_config()).unwrap();
    let result = scanner
        .scan("7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV", None)
        .await
        .unwrap();

    assert_eq!(result.chain, Chain::Unsupported("solana".to_string()));
    assert_eq!(result.traceability_score, 0);
    assert_eq!(result.risk_level, RiskLevel::Safe);
    assert_eq!(result.tx_count, 0);
    assert!(result.warnings.iter().any(|w| w.contains("chain not supported")));
}

// ============================================
// Properties
// ============================================

#[test]
fn test_score_always_bounded() {
    let counterparties = [BINANCE, COINBASE, KRAKEN, TORNADO_ROUTER, SUBJECT];
    for n in 0..40usize {
        for sanctioned in [false, true] {
            let txs: Vec<Transaction> = (0..n)
                .map(|i| {
                    let direction = if i % 3 == 0 { Direction::Received } else { Direction::Sent };
                    tx(&format!("0x{:04x}", i), counterparties[i % counterparties.len()], direction)
                })
                .collect();
            let mut activity = activity(txs);
            activity.tx_count = (n * 10) as u64;

            let result = assemble(
                &subject(),
                activity,
                SanctionsOutcome {
                    sanctioned,
                    warning: None,
                },
            );
            assert!(result.traceability_score <= 100);
            if sanctioned {
                assert_eq!(result.risk_level, RiskLevel::Critical);
            }
        }
    }
}

#[test]
fn test_mixer_on_traceable_wallet_is_high() {
    let mut txs: Vec<Transaction> = (0..10)
        .map(|i| tx(&format!("0x{:02x}", i), [BINANCE, COINBASE, KRAKEN][i % 3], Direction::Sent))
        .collect();
    txs.push(tx("0xff", TORNADO_ROUTER, Direction::Sent));

    let result = assemble(&subject(), activity(txs), SanctionsOutcome::default());
    // 45 + 15 + 15 - 10
    assert_eq!(result.traceability_score, 65);
    assert!(result.used_mixer);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert!(result.is_traceable);
}

#[test]
fn test_exchanges_detected_sorted_and_unique() {
    let result = assemble(
        &subject(),
        activity(vec![
            tx("0x01", KRAKEN, Direction::Received),
            tx("0x02", BINANCE, Direction::Sent),
            tx("0x03", COINBASE, Direction::Received),
            tx("0x04", BINANCE, Direction::Received),
        ]),
        SanctionsOutcome::default(),
    );

    assert_eq!(result.exchanges_detected, vec!["Binance", "Coinbase", "Kraken"]);
    assert_eq!(result.exchange_interactions.len(), 4);
}

#[test]
fn test_no_signals_means_anonymous() {
    let strangers: Vec<Transaction> = (0..20)
        .map(|i| tx(&format!("0x{:02x}", i), &format!("0x{:040x}", i + 1), Direction::Received))
        .collect();

    let result = assemble(&subject(), activity(strangers), SanctionsOutcome::default());
    assert_eq!(result.traceability_score, 0);
    assert_eq!(result.traceability_details, vec![ANONYMOUS]);
    assert_eq!(result.risk_level, RiskLevel::Safe);
}

#[test]
fn test_scoring_is_idempotent() {
    let result = assemble(
        &subject(),
        activity(vec![
            tx("0x01", BINANCE, Direction::Sent),
            tx("0x02", TORNADO_ROUTER, Direction::Received),
        ]),
        SanctionsOutcome::default(),
    );

    let first = TraceabilityScore::evaluate(&result, result.sanctioned);
    let second = TraceabilityScore::evaluate(&result, result.sanctioned);
    assert_eq!(first, second);
    assert_eq!(first.total, result.traceability_score);
    assert_eq!(first.details(), result.traceability_details);
}

// ============================================
// Degraded scans
// ============================================

#[tokio::test]
async fn test_bitcoin_scan_with_provider_down() {
    let scanner = WalletScanner::new(&offline_config()).unwrap();
    let result = scanner
        .scan("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", Some("bitcoin"))
        .await
        .unwrap();

    assert_eq!(result.chain, Chain::Bitcoin);
    assert!(result.balance.is_none());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("blockchain.info"));
    assert_eq!(result.risk_level, RiskLevel::Safe);
}

#[tokio::test]
async fn test_invalid_address_rejected_before_network() {
    let scanner = WalletScanner::new(&offline_config()).unwrap();
    for bad in ["", "0x12", "hello world address", "0xZZZZ5FBFe3E9af3971dD833D26bA9b5C936f0bE"] {
        let err = scanner.scan(bad, None).await.unwrap_err();
        assert_eq!(err.code_str(), "ADDR_INVALID", "input: {:?}", bad);
    }
}

// ============================================
// Against a mock provider
// ============================================

async fn mock_etherscan(server: &MockServer, action: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("action", action))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn mocked_config(server: &MockServer) -> ScanConfig {
    ScanConfig {
        etherscan_base_url: format!("{}/api", server.uri()),
        blockchain_info_base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        oracle_timeout: Duration::from_secs(5),
        ..ScanConfig::default()
    }
}

#[tokio::test]
async fn test_sanctioned_address_scan_is_critical() {
    let server = MockServer::start().await;
    let oracle = ScanConfig::default().sanctions_oracle_address;

    mock_etherscan(
        &server,
        "balance",
        json!({"status": "1", "message": "OK", "result": "250000000000000000"}),
    )
    .await;
    mock_etherscan(
        &server,
        "txlist",
        json!({"status": "1", "message": "OK", "result": [
            {"hash": "0x01", "from": SUBJECT, "to": BINANCE, "value": "100000000000000000", "timeStamp": "1700000000"}
        ]}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("module", "proxy"))
        .and(query_param("action", "eth_call"))
        .and(query_param("to", oracle.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1,
            "result": format!("0x{}1", "0".repeat(63))
        })))
        .mount(&server)
        .await;

    let scanner = WalletScanner::new(&mocked_config(&server)).unwrap();
    let result = scanner.scan(SUBJECT, None).await.unwrap();

    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert!(result.sanctioned);
    assert_eq!(result.balance.as_deref(), Some("0.250000 ETH"));
    assert_eq!(result.exchanges_detected, vec!["Binance"]);
    // 15 + 5 + 15 + 20
    assert_eq!(result.traceability_score, 55);
    assert_eq!(result.risk_level, RiskLevel::Critical);
    assert!(result
        .traceability_details
        .iter()
        .any(|d| d.starts_with("Address is sanctioned")));
}

#[tokio::test]
async fn test_malformed_oracle_reply_fails_open() {
    let server = MockServer::start().await;
    mock_etherscan(&server, "balance", json!({"status": "1", "message": "OK", "result": "0"})).await;
    mock_etherscan(
        &server,
        "txlist",
        json!({"status": "0", "message": "No transactions found", "result": []}),
    )
    .await;
    mock_etherscan(&server, "eth_call", json!({"jsonrpc": "2.0", "id": 1, "result": "0x01"})).await;

    let scanner = WalletScanner::new(&mocked_config(&server)).unwrap();
    let result = scanner.scan(SUBJECT, None).await.unwrap();

    assert!(!result.sanctioned);
    assert_eq!(result.risk_level, RiskLevel::Safe);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("[ORACLE_MALFORMED] Sanctions oracle:"));
    assert!(result.warnings[0].ends_with("treated as not sanctioned"));
}
