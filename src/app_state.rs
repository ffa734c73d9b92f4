use std::sync::Arc;
use std::time::Duration;

use crate::{
    rpc::{HttpLedgerClient, LedgerRpc},
    utils::env::EnvVars,
};

pub struct AppState {
    pub ledger: Arc<dyn LedgerRpc>,
    pub env_vars: EnvVars,
}

impl AppState {
    /// Initialize the application state with an HTTP ledger client built from config
    pub fn new(env_vars: EnvVars) -> Result<AppState, Box<dyn std::error::Error>> {
        let ledger = HttpLedgerClient::new(
            env_vars.eth_rpc_url.clone(),
            Duration::from_secs(env_vars.rpc_timeout_seconds),
        )?;

        log::info!("Using ledger node at {}", ledger.url());

        Ok(Self::with_ledger(Arc::new(ledger), env_vars))
    }

    /// Build state around an existing ledger implementation
    pub fn with_ledger(ledger: Arc<dyn LedgerRpc>, env_vars: EnvVars) -> AppState {
        AppState { ledger, env_vars }
    }

    /// Deadline applied to each query as a whole
    pub fn query_deadline(&self) -> Duration {
        Duration::from_secs(self.env_vars.query_timeout_seconds)
    }
}
