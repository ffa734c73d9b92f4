use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::abi::DecodeError;
use crate::rpc::RpcError;

/// Failure of one of the activity queries
#[derive(Debug)]
pub enum QueryError {
    /// Malformed or missing request parameter
    InvalidInput(String),
    Rpc(RpcError),
    Decode(DecodeError),
    /// No block exists strictly before the requested date
    NotFound(String),
    /// The query did not finish within its deadline
    DeadlineExceeded(std::time::Duration),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            QueryError::Rpc(err) => write!(f, "{}", err),
            QueryError::Decode(err) => write!(f, "Failed to decode log: {}", err),
            QueryError::NotFound(msg) => write!(f, "Not found: {}", msg),
            QueryError::DeadlineExceeded(limit) => {
                write!(f, "Query did not complete within {}s", limit.as_secs_f64())
            }
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Rpc(err) => Some(err),
            QueryError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RpcError> for QueryError {
    fn from(err: RpcError) -> Self {
        QueryError::Rpc(err)
    }
}

impl From<DecodeError> for QueryError {
    fn from(err: DecodeError) -> Self {
        QueryError::Decode(err)
    }
}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            QueryError::Rpc(_) => StatusCode::BAD_GATEWAY,
            QueryError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            QueryError::NotFound(_) => StatusCode::NOT_FOUND,
            QueryError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("Query failed: {}", self);
        } else {
            log::warn!("Query rejected: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
