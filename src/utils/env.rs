#[derive(Clone, Debug)]
pub struct EnvVars {
    pub eth_rpc_url: String,
    pub port: u16,
    // Per-call transport timeout for the ledger node
    pub rpc_timeout_seconds: u64,
    // Deadline for a whole query (a balance lookup makes many calls)
    pub query_timeout_seconds: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for EnvVars {
    fn default() -> Self {
        Self {
            eth_rpc_url: std::env::var("ETH_RPC_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://mainnet.infura.io".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            rpc_timeout_seconds: std::env::var("RPC_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            query_timeout_seconds: std::env::var("QUERY_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}
