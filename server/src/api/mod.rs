//! HTTP API.
//!
//! Thin axum layer over the auth and document services. Handlers move all
//! blocking work (Argon2, SQLite) onto tokio's blocking pool.

mod auth;
mod documents;
pub mod error;
pub mod extract;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub use auth::{LoginForm, PrincipalPublic, RegisterRequest, TokenResponse};

use crate::auth::{AuthService, IdentityResolver, PasswordError, PasswordService, TokenService};
use crate::config::ServerConfig;
use crate::documents::DocumentService;
use crate::error::Error;
use crate::store::Store;
use crate::time::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub identity: Arc<IdentityResolver>,
    pub documents: Arc<DocumentService>,
}

impl AppState {
    /// Wire the production services around an open store.
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
    pub fn new(config: &ServerConfig, store: Arc<Store>) -> Result<Self, PasswordError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let tokens = TokenService::new(config.token.clone());
        let passwords = PasswordService::with_default_params()?;

        Ok(Self {
            auth: Arc::new(AuthService::new(
                Arc::clone(&store),
                passwords,
                tokens.clone(),
                Arc::clone(&clock),
            )),
            identity: Arc::new(IdentityResolver::new(
                tokens,
                Arc::clone(&store),
                Arc::clone(&clock),
            )),
            documents: Arc::new(DocumentService::new(store, clock)),
        })
    }
}

/// Build the application router.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route(
            "/documents",
            post(documents::create_document).get(documents::list_documents),
        )
        .route(
            "/documents/{id}",
            get(documents::get_document).put(documents::update_document),
        )
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    // Credentials rule out wildcards, so methods and headers mirror the request.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Knowledge Hub API is running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run blocking service work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Internal(format!("blocking task failed: {e}")))?
}
