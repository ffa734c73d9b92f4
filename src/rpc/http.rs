//! JSON-RPC ledger client over HTTP
//!
//! Speaks the standard Ethereum JSON-RPC methods (`eth_getLogs`, `eth_getBlockByNumber`,
//! `eth_blockNumber`, `eth_getBalance`) against a single node endpoint.

use alloy_primitives::{Address, B256, Bytes, U64, U256, hex};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{BlockHeader, LedgerRpc, LogFilter, LogRecord, RpcError};
use crate::utils::jsonrpc::{JsonRpcRequest, JsonRpcResponse, quantity};

/// Log object as returned by `eth_getLogs`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcLog {
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
    block_number: Option<U64>,
    transaction_hash: Option<B256>,
    log_index: Option<U64>,
}

impl From<RpcLog> for LogRecord {
    fn from(log: RpcLog) -> Self {
        LogRecord {
            tx_hash: log.transaction_hash,
            address: log.address,
            topics: log.topics,
            data: log.data,
            block_number: log.block_number.map(|n| n.to::<u64>()),
            log_index: log.log_index.map(|n| n.to::<u64>()),
        }
    }
}

/// The subset of a block object we read
#[derive(Debug, Deserialize)]
struct RpcBlock {
    number: U64,
    timestamp: U64,
}

pub struct HttpLedgerClient {
    http_client: Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpLedgerClient {
    /// Creates a client for `url` with a per-call transport timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        Ok(Self::with_client(http_client, url))
    }

    /// Creates a client that reuses an existing `reqwest::Client`
    pub fn with_client(http_client: Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one JSON-RPC call and returns the raw `result` (which may be `null`)
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Option<T>, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id.to_string(), method, params);

        log::debug!("RPC {} -> {} (id {})", method, self.url, id);

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport(format!("{} failed: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Transport(format!(
                "{} returned HTTP {}",
                method, status
            )));
        }

        let body: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e)))?;

        if let Some(error) = body.error {
            log::warn!("RPC {} rejected by node: {}", method, error.message);
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
            });
        }

        Ok(body.result)
    }

    async fn call_required<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, RpcError> {
        self.call(method, params)
            .await?
            .ok_or_else(|| RpcError::InvalidResponse(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl LedgerRpc for HttpLedgerClient {
    async fn filter_logs(&self, filter: &LogFilter) -> Result<Vec<LogRecord>, RpcError> {
        let to_block = filter
            .to_block
            .map(quantity)
            .unwrap_or_else(|| "latest".to_string());

        let addresses: Vec<String> = filter
            .addresses
            .iter()
            .map(hex::encode_prefixed)
            .collect();

        let params = json!({
            "fromBlock": quantity(filter.from_block),
            "toBlock": to_block,
            "address": addresses,
        });

        let logs: Vec<RpcLog> = self.call_required("eth_getLogs", vec![params]).await?;
        Ok(logs.into_iter().map(LogRecord::from).collect())
    }

    async fn block_by_number(&self, number: u64) -> Result<BlockHeader, RpcError> {
        let block: Option<RpcBlock> = self
            .call(
                "eth_getBlockByNumber",
                vec![json!(quantity(number)), json!(false)],
            )
            .await?;

        let block = block.ok_or(RpcError::MissingBlock(number))?;
        let returned = block.number.to::<u64>();
        if returned != number {
            return Err(RpcError::InvalidResponse(format!(
                "requested block {} but node returned block {}",
                number, returned
            )));
        }

        Ok(BlockHeader {
            number: returned,
            timestamp: block.timestamp.to::<u64>(),
        })
    }

    async fn current_block_number(&self) -> Result<u64, RpcError> {
        let number: U64 = self.call_required("eth_blockNumber", vec![]).await?;
        Ok(number.to::<u64>())
    }

    async fn balance_at(&self, account: Address, block: u64) -> Result<U256, RpcError> {
        self.call_required(
            "eth_getBalance",
            vec![json!(hex::encode_prefixed(account)), json!(quantity(block))],
        )
        .await
    }
}
