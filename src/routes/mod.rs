use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::{AppState, handlers};

async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.ledger.current_block_number().await {
        Ok(block_number) => Ok(Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "ledger": {
                "connected": true,
                "blockNumber": block_number
            }
        }))),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                    "ledger": {
                        "connected": false,
                        "error": e.to_string()
                    }
                })),
            ))
        }
    }
}

pub fn create_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        // Account activity endpoints
        .route("/api/balance", get(handlers::balance::get_balance))
        .route(
            "/api/transactions",
            get(handlers::logs::get_transactions),
        )
        .route(
            "/api/nft-transfers",
            get(handlers::transfers::get_nft_transfers),
        )
        .with_state(state)
}
