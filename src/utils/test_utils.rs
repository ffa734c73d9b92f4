//! Test utilities for the query handlers
//!
//! Provides an in-memory ledger implementing [`LedgerRpc`] and helpers for building logs.

use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::abi::transfer_schema;
use crate::rpc::{BlockHeader, LedgerRpc, LogFilter, LogRecord, RpcError};

/// A chain held in memory: block `n` has timestamp `timestamps[n]`
#[derive(Default)]
pub struct MockLedger {
    timestamps: Vec<u64>,
    logs: Vec<LogRecord>,
    balances: HashMap<(Address, u64), U256>,
    failing_block: Option<u64>,
    fail_logs: bool,
    block_delay: Option<Duration>,
    height_skew: u64,
    block_fetches: AtomicUsize,
    filters: Mutex<Vec<LogFilter>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamps(mut self, timestamps: Vec<u64>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// One block every `interval` seconds starting at `genesis`, heights `0..=head`
    pub fn with_regular_blocks(self, head: u64, genesis: u64, interval: u64) -> Self {
        let timestamps = (0..=head).map(|n| genesis + n * interval).collect();
        self.with_timestamps(timestamps)
    }

    pub fn with_logs(mut self, logs: Vec<LogRecord>) -> Self {
        self.logs = logs;
        self
    }

    pub fn with_balance(mut self, account: Address, block: u64, balance: U256) -> Self {
        self.balances.insert((account, block), balance);
        self
    }

    pub fn failing_at_block(mut self, block: u64) -> Self {
        self.failing_block = Some(block);
        self
    }

    pub fn failing_logs(mut self) -> Self {
        self.fail_logs = true;
        self
    }

    pub fn with_block_delay(mut self, delay: Duration) -> Self {
        self.block_delay = Some(delay);
        self
    }

    /// Answer `block_by_number(n)` with a header claiming height `n + skew`
    pub fn with_height_skew(mut self, skew: u64) -> Self {
        self.height_skew = skew;
        self
    }

    /// Number of `block_by_number` calls served so far
    pub fn block_fetches(&self) -> usize {
        self.block_fetches.load(Ordering::SeqCst)
    }

    /// Filters received by `filter_logs`, in call order
    pub fn recorded_filters(&self) -> Vec<LogFilter> {
        self.filters.lock().unwrap().clone()
    }

    fn head(&self) -> Result<u64, RpcError> {
        match self.timestamps.len() {
            0 => Err(RpcError::InvalidResponse("empty chain".to_string())),
            n => Ok(n as u64 - 1),
        }
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn filter_logs(&self, filter: &LogFilter) -> Result<Vec<LogRecord>, RpcError> {
        self.filters.lock().unwrap().push(filter.clone());

        if self.fail_logs {
            return Err(RpcError::Node {
                code: Some(-32005),
                message: "query timeout exceeded".to_string(),
            });
        }

        let to_block = filter.to_block.unwrap_or(u64::MAX);
        Ok(self
            .logs
            .iter()
            .filter(|log| filter.addresses.contains(&log.address))
            .filter(|log| {
                let block = log.block_number.unwrap_or_default();
                block >= filter.from_block && block <= to_block
            })
            .cloned()
            .collect())
    }

    async fn block_by_number(&self, number: u64) -> Result<BlockHeader, RpcError> {
        self.block_fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.block_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_block == Some(number) {
            return Err(RpcError::Transport("connection reset by peer".to_string()));
        }

        self.timestamps
            .get(number as usize)
            .map(|&timestamp| BlockHeader {
                number: number + self.height_skew,
                timestamp,
            })
            .ok_or(RpcError::MissingBlock(number))
    }

    async fn current_block_number(&self) -> Result<u64, RpcError> {
        self.head()
    }

    async fn balance_at(&self, account: Address, block: u64) -> Result<U256, RpcError> {
        Ok(self
            .balances
            .get(&(account, block))
            .copied()
            .unwrap_or(U256::ZERO))
    }
}

/// A log with arbitrary topics and payload
pub fn raw_log(
    contract: Address,
    topics: Vec<B256>,
    data: Vec<u8>,
    block: u64,
    index: u64,
) -> LogRecord {
    LogRecord {
        tx_hash: Some(B256::from(U256::from(block * 16 + index))),
        address: contract,
        topics,
        data: Bytes::from(data),
        block_number: Some(block),
        log_index: Some(index),
    }
}

/// A well-formed 3-topic Transfer log with `token_id` in the payload
pub fn transfer_log(
    contract: Address,
    from: Address,
    to: Address,
    token_id: u64,
    block: u64,
    index: u64,
) -> LogRecord {
    raw_log(
        contract,
        vec![transfer_schema().selector(), from.into_word(), to.into_word()],
        U256::from(token_id).to_be_bytes::<32>().to_vec(),
        block,
        index,
    )
}
