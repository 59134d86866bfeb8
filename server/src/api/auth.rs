//! `/auth` routes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Form, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::extract::CurrentPrincipal;
use super::{AppState, blocking};
use crate::error::Error;
use crate::store::{Principal, PrincipalId};

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2 password-grant style form; `username` carries the email.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// The externally visible part of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalPublic {
    pub id: PrincipalId,
    pub email: String,
}

impl From<&Principal> for PrincipalPublic {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            email: principal.email.clone(),
        }
    }
}

#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PrincipalPublic>), Error> {
    let auth = Arc::clone(&state.auth);
    let principal = blocking(move || auth.register(&body.email, &body.password)).await?;
    Ok((StatusCode::CREATED, Json(PrincipalPublic::from(&principal))))
}

#[allow(clippy::disallowed_methods)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, Error> {
    let auth = Arc::clone(&state.auth);
    let access_token = blocking(move || auth.authenticate(&form.username, &form.password)).await?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<PrincipalPublic> {
    Json(PrincipalPublic::from(&principal))
}
