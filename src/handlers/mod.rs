pub mod balance;
pub mod logs;
pub mod transfers;

use std::future::Future;
use std::time::Duration;

use crate::error::QueryError;

/// Runs a query under a deadline; on expiry the query future is dropped,
/// which cancels any RPC call still in flight.
pub async fn with_deadline<T, F>(limit: Duration, query: F) -> Result<T, QueryError>
where
    F: Future<Output = Result<T, QueryError>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result,
        Err(_) => Err(QueryError::DeadlineExceeded(limit)),
    }
}
