#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use evm_activity::{AppState, routes, rpc::HttpLedgerClient, utils::env::EnvVars};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// keccak256("Approval(address,address,uint256)")
pub const APPROVAL_TOPIC: &str =
    "0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925";

/// Config for tests, independent of the process environment
pub fn test_env_vars(rpc_url: &str, query_timeout_seconds: u64) -> EnvVars {
    EnvVars {
        eth_rpc_url: rpc_url.to_string(),
        port: 0,
        rpc_timeout_seconds: 10,
        query_timeout_seconds,
        cors_allowed_origins: vec!["*".to_string()],
    }
}

/// Router wired to a real HTTP ledger client pointing at the mock node
pub fn test_app(mock_server: &MockServer) -> Router {
    test_app_with_deadline(mock_server, 30)
}

pub fn test_app_with_deadline(mock_server: &MockServer, query_timeout_seconds: u64) -> Router {
    let env_vars = test_env_vars(&mock_server.uri(), query_timeout_seconds);
    let ledger = HttpLedgerClient::new(mock_server.uri(), Duration::from_secs(10))
        .expect("Failed to build ledger client");

    let state = Arc::new(AppState::with_ledger(Arc::new(ledger), env_vars));
    routes::create_routes(state)
}

pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": result
    }))
}

/// Mount a JSON-RPC answer for `rpc_method`, optionally only for exact `params`
pub async fn mount_rpc(
    mock_server: &MockServer,
    rpc_method: &str,
    params: Option<Value>,
    result: Value,
) {
    let mut body = json!({ "method": rpc_method });
    if let Some(params) = params {
        body["params"] = params;
    }

    Mock::given(method("POST"))
        .and(body_partial_json(body))
        .respond_with(rpc_result(result))
        .mount(mock_server)
        .await;
}

/// Mount a block with the given timestamp for `eth_getBlockByNumber`
pub async fn mount_block(mock_server: &MockServer, number: u64, timestamp: u64) {
    let number_hex = format!("{:#x}", number);
    mount_rpc(
        mock_server,
        "eth_getBlockByNumber",
        Some(json!([number_hex, false])),
        json!({
            "number": number_hex,
            "timestamp": format!("{:#x}", timestamp),
        }),
    )
    .await;
}

/// 32-byte topic for an address, left-padded with zeros
pub fn address_topic(address: &str) -> String {
    format!(
        "0x000000000000000000000000{}",
        address.trim_start_matches("0x").to_lowercase()
    )
}

/// 32-byte big-endian word for an integer
pub fn uint_word(value: u64) -> String {
    format!("0x{:064x}", value)
}

pub fn log_json(
    contract: &str,
    topics: Vec<String>,
    data: &str,
    block: u64,
    index: u64,
) -> Value {
    json!({
        "address": contract,
        "topics": topics,
        "data": data,
        "blockNumber": format!("{:#x}", block),
        "transactionHash": format!("0x{:064x}", block * 1000 + index),
        "logIndex": format!("{:#x}", index),
        "removed": false
    })
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}
