//! NFT transfer decoding
//!
//! Pulls a contract's logs, keeps the `Transfer` events where the target account is
//! sender or receiver, and decodes them through the schema registry.

use alloy_primitives::{Address, U256};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    AppState,
    abi::{DecodeError, DecodedEvent, nft_registry},
    error::QueryError,
    handlers::{logs::fetch_logs, with_deadline},
    rpc::LedgerRpc,
    utils::params::{parse_address, parse_start_block},
};

const TRANSFER_EVENT: &str = "Transfer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub token_id: U256,
}

impl TryFrom<&DecodedEvent> for TransferEvent {
    type Error = DecodeError;

    fn try_from(event: &DecodedEvent) -> Result<Self, Self::Error> {
        let missing = |param: &'static str| DecodeError::MissingParam {
            event: event.name,
            param,
        };

        Ok(TransferEvent {
            from: event.address("from").ok_or_else(|| missing("from"))?,
            to: event.address("to").ok_or_else(|| missing("to"))?,
            token_id: event.uint("tokenId").ok_or_else(|| missing("tokenId"))?,
        })
    }
}

#[derive(Deserialize)]
pub struct NftTransfersQuery {
    pub address: Option<String>,
    #[serde(rename = "contractAddress")]
    pub contract_address: Option<String>,
    #[serde(rename = "startBlock")]
    pub start_block: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NftTransfer {
    pub from: String,
    pub to: String,
    #[serde(rename = "tokenId")]
    pub token_id: String,
}

impl From<&TransferEvent> for NftTransfer {
    fn from(event: &TransferEvent) -> Self {
        NftTransfer {
            from: event.from.to_checksum(None),
            to: event.to.to_checksum(None),
            token_id: event.token_id.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NftTransfersResponse {
    #[serde(rename = "nftTransfers")]
    pub nft_transfers: Vec<NftTransfer>,
}

/// Transfer events of `contract` since `start_block` where `target` is sender or receiver
///
/// Logs whose first topic is not the Transfer signature, or whose topic count does not
/// fit the schema, are skipped. A matching log with a malformed payload fails the whole
/// call. Output keeps ledger order.
pub async fn decode_transfers(
    ledger: &dyn LedgerRpc,
    contract: Address,
    target: Address,
    start_block: u64,
) -> Result<Vec<TransferEvent>, QueryError> {
    let logs = fetch_logs(ledger, contract, start_block).await?;
    let registry = nft_registry();
    // Indexed address topics are the address left-padded to 32 bytes, so comparing
    // words is exact and independent of hex letter case.
    let target_word = target.into_word();

    let mut events = Vec::new();
    for log in &logs {
        let Some(schema) = log.topics.first().and_then(|topic| registry.get(topic)) else {
            continue;
        };
        if schema.name != TRANSFER_EVENT || !schema.matches(&log.topics) {
            continue;
        }
        if log.topics[1] != target_word && log.topics[2] != target_word {
            continue;
        }

        let decoded = schema.decode(&log.topics, &log.data)?;
        events.push(TransferEvent::try_from(&decoded)?);
    }

    log::debug!(
        "Decoded {} of {} logs from {} as transfers involving {}",
        events.len(),
        logs.len(),
        contract,
        target
    );

    Ok(events)
}

/// Main handler for the NFT transfers endpoint
pub async fn get_nft_transfers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NftTransfersQuery>,
) -> Result<Json<NftTransfersResponse>, QueryError> {
    let target = parse_address("address", params.address.as_deref())?;
    let contract = parse_address("contractAddress", params.contract_address.as_deref())?;
    let start_block = parse_start_block("startBlock", params.start_block.as_deref())?;

    let events = with_deadline(
        state.query_deadline(),
        decode_transfers(state.ledger.as_ref(), contract, target, start_block),
    )
    .await?;

    Ok(Json(NftTransfersResponse {
        nft_transfers: events.iter().map(NftTransfer::from).collect(),
    }))
}
