//! Ledger node access
//!
//! The core query logic talks to the chain only through the [`LedgerRpc`] trait.
//! Production code uses [`HttpLedgerClient`]; tests inject an in-memory ledger.

use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;

pub mod http;

pub use http::HttpLedgerClient;

/// Filter for `eth_getLogs`
///
/// `to_block` of `None` means the chain head at the time the node evaluates the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub from_block: u64,
    pub to_block: Option<u64>,
    pub addresses: Vec<Address>,
}

impl LogFilter {
    /// Logs emitted by `address` from `from_block` up to the chain head
    pub fn for_address(address: Address, from_block: u64) -> Self {
        Self {
            from_block,
            to_block: None,
            addresses: vec![address],
        }
    }
}

/// One emitted event, as reported by the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub tx_hash: Option<B256>,
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: Option<u64>,
    pub log_index: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
    /// Unix seconds
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Connection failure, timeout or non-success HTTP status
    Transport(String),
    /// The node answered with a JSON-RPC error object
    Node { code: Option<i32>, message: String },
    /// The response could not be interpreted
    InvalidResponse(String),
    /// The node has no block at this height
    MissingBlock(u64),
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RpcError::Transport(msg) => write!(f, "Ledger node unreachable: {}", msg),
            RpcError::Node {
                code: Some(code),
                message,
            } => write!(f, "Ledger node error {}: {}", code, message),
            RpcError::Node { code: None, message } => write!(f, "Ledger node error: {}", message),
            RpcError::InvalidResponse(msg) => {
                write!(f, "Invalid response from ledger node: {}", msg)
            }
            RpcError::MissingBlock(number) => {
                write!(f, "Ledger node has no block {}", number)
            }
        }
    }
}

impl std::error::Error for RpcError {}

/// The four read primitives the query logic needs from a ledger node
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Logs matching the filter, in ledger order
    async fn filter_logs(&self, filter: &LogFilter) -> Result<Vec<LogRecord>, RpcError>;

    async fn block_by_number(&self, number: u64) -> Result<BlockHeader, RpcError>;

    /// Height of the chain head
    async fn current_block_number(&self) -> Result<u64, RpcError>;

    /// Account balance in wei at the given block
    async fn balance_at(&self, account: Address, block: u64) -> Result<U256, RpcError>;
}
