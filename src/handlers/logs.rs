use alloy_primitives::{Address, hex};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    AppState,
    error::QueryError,
    handlers::with_deadline,
    rpc::{LedgerRpc, LogFilter, LogRecord},
    utils::params::{parse_address, parse_start_block},
};

#[derive(Deserialize)]
pub struct TransactionsQuery {
    pub address: Option<String>,
    #[serde(rename = "startBlock")]
    pub start_block: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionData {
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub address: String,
    pub data: String,
}

impl From<&LogRecord> for TransactionData {
    fn from(log: &LogRecord) -> Self {
        TransactionData {
            tx_hash: log.tx_hash.map(hex::encode_prefixed),
            address: log.address.to_checksum(None),
            data: hex::encode_prefixed(&log.data),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionData>,
}

/// Fetch every log emitted by `address` from `start_block` up to the chain head
///
/// Records are returned in the order the node reports them (ascending block, then
/// log index). No matches is an empty vector.
pub async fn fetch_logs(
    ledger: &dyn LedgerRpc,
    address: Address,
    start_block: u64,
) -> Result<Vec<LogRecord>, QueryError> {
    let filter = LogFilter::for_address(address, start_block);
    let logs = ledger.filter_logs(&filter).await?;

    log::debug!(
        "Fetched {} logs for {} from block {}",
        logs.len(),
        address,
        start_block
    );

    Ok(logs)
}

/// Main handler for the transactions endpoint
pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionsQuery>,
) -> Result<Json<TransactionsResponse>, QueryError> {
    let address = parse_address("address", params.address.as_deref())?;
    let start_block = parse_start_block("startBlock", params.start_block.as_deref())?;

    let logs = with_deadline(
        state.query_deadline(),
        fetch_logs(state.ledger.as_ref(), address, start_block),
    )
    .await?;

    Ok(Json(TransactionsResponse {
        transactions: logs.iter().map(TransactionData::from).collect(),
    }))
}
