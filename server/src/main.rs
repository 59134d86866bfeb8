#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code to prevent panics on bad input.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use knowledge_hub::api::{self, AppState};
use knowledge_hub::config::ServerConfig;
use knowledge_hub::store::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knowledge_hub=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; using the development-only signing secret");
    }
    tracing::info!(
        "Loaded configuration: database_path={}, listen_port={}, algorithm={:?}, token_ttl_minutes={}",
        config.database_path.display(),
        config.listen_port,
        config.token.algorithm(),
        config.token.ttl().num_minutes()
    );

    let store = match Store::open(&config.database_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let state = match AppState::new(&config, store) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize services: {e}");
            std::process::exit(1);
        }
    };

    let app = api::router(state, &config.cors_origins);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}
