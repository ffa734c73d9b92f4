use axum::{Router, http::HeaderValue};
use evm_activity::{AppState, routes, utils::env::EnvVars};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let env_vars = EnvVars::default();
    let port = env_vars.port;
    let cors = cors_layer(&env_vars.cors_allowed_origins);

    let state = Arc::new(AppState::new(env_vars).expect("Failed to initialize app state"));

    let app = Router::new()
        .merge(routes::create_routes(state))
        .layer(cors);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    log::info!("Server running on {}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
