//! Historical balance lookup
//!
//! Resolves a calendar date to the last block mined strictly before it, then reads the
//! account balance at that block.

use alloy_primitives::{Address, U256};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    AppState,
    error::QueryError,
    handlers::with_deadline,
    rpc::{BlockHeader, LedgerRpc, RpcError},
    utils::{
        datetime::unix_seconds,
        params::{parse_address, parse_date},
    },
};

#[derive(Deserialize)]
pub struct BalanceQuery {
    pub address: Option<String>,
    pub date: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BalanceResponse {
    /// Wei, as a decimal string
    pub balance: String,
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBalance {
    pub balance: U256,
    pub block: BlockHeader,
}

/// Fetch block `number`, rejecting a header for any other height
async fn fetch_block(ledger: &dyn LedgerRpc, number: u64) -> Result<BlockHeader, QueryError> {
    let block = ledger.block_by_number(number).await?;
    if block.number != number {
        return Err(RpcError::InvalidResponse(format!(
            "requested block {} but got block {}",
            number, block.number
        ))
        .into());
    }
    Ok(block)
}

/// Find the most recent block whose timestamp is strictly before `target`
///
/// Block timestamps never decrease with height, so this is a binary search over
/// `[0, head]` that keeps `ts(lo) < target <= ts(hi)`. It makes at most
/// `2 + ceil(log2(head))` block fetches.
///
/// # Returns
/// * `Ok(block)` - The answer block
/// * `Err(QueryError::NotFound)` - If even genesis is not before `target`
/// * `Err(QueryError::Rpc)` - If any fetch fails; the search stops immediately
pub async fn find_block_before(
    ledger: &dyn LedgerRpc,
    target: DateTime<Utc>,
) -> Result<BlockHeader, QueryError> {
    let target_ts = unix_seconds(target);
    let not_found = || QueryError::NotFound(format!("no block exists before {}", target));

    let head = ledger.current_block_number().await?;
    let head_block = fetch_block(ledger, head).await?;

    if head_block.timestamp < target_ts {
        log::info!("Chain head {} is before {}", head, target);
        return Ok(head_block);
    }
    if head == 0 {
        return Err(not_found());
    }

    let genesis = fetch_block(ledger, 0).await?;
    if genesis.timestamp >= target_ts {
        return Err(not_found());
    }

    log::info!(
        "Binary searching for last block before {} in range [0, {}]",
        target,
        head
    );

    // head > 0 here, so lo < hi holds throughout
    let mut lo = 0;
    let mut lo_block = genesis;
    let mut hi = head;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        let block = fetch_block(ledger, mid).await?;

        log::debug!(
            "Checking block {} with timestamp {} (target: {})",
            mid,
            block.timestamp,
            target_ts
        );

        if block.timestamp < target_ts {
            lo = mid;
            lo_block = block;
        } else {
            hi = mid;
        }
    }

    log::info!(
        "Resolved {} to block {} (timestamp {})",
        target,
        lo_block.number,
        lo_block.timestamp
    );

    Ok(lo_block)
}

/// Balance of `account` at the last block strictly before `target`
pub async fn balance_at(
    ledger: &dyn LedgerRpc,
    account: Address,
    target: DateTime<Utc>,
) -> Result<AccountBalance, QueryError> {
    let block = find_block_before(ledger, target).await?;
    let balance = ledger.balance_at(account, block.number).await?;

    Ok(AccountBalance { balance, block })
}

/// Main handler for the balance endpoint
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BalanceQuery>,
) -> Result<Json<BalanceResponse>, QueryError> {
    let account = parse_address("address", params.address.as_deref())?;
    let date = parse_date("date", params.date.as_deref())?;

    let result = with_deadline(
        state.query_deadline(),
        balance_at(state.ledger.as_ref(), account, date),
    )
    .await?;

    Ok(Json(BalanceResponse {
        balance: result.balance.to_string(),
        block_number: result.block.number,
    }))
}
