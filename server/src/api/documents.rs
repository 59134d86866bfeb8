//! `/documents` routes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::extract::CurrentPrincipal;
use super::{AppState, blocking};
use crate::documents::{DocumentUpdate, NewDocument};
use crate::error::Error;
use crate::store::{Document, DocumentId};

#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
pub async fn create_document(
    CurrentPrincipal(principal): CurrentPrincipal,
    State(state): State<AppState>,
    Json(body): Json<NewDocument>,
) -> Result<(StatusCode, Json<Document>), Error> {
    let documents = Arc::clone(&state.documents);
    let document = blocking(move || documents.create(&principal, &body)).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[allow(clippy::disallowed_methods)]
pub async fn list_documents(
    CurrentPrincipal(principal): CurrentPrincipal,
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, Error> {
    let documents = Arc::clone(&state.documents);
    let list = blocking(move || documents.list(&principal)).await?;
    Ok(Json(list))
}

#[allow(clippy::disallowed_methods)]
pub async fn get_document(
    CurrentPrincipal(principal): CurrentPrincipal,
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> Result<Json<Document>, Error> {
    let documents = Arc::clone(&state.documents);
    let document = blocking(move || documents.get(&principal, id)).await?;
    Ok(Json(document))
}

#[allow(clippy::disallowed_methods)]
pub async fn update_document(
    CurrentPrincipal(principal): CurrentPrincipal,
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
    Json(body): Json<DocumentUpdate>,
) -> Result<Json<Document>, Error> {
    let documents = Arc::clone(&state.documents);
    let document = blocking(move || documents.update(&principal, id, &body)).await?;
    Ok(Json(document))
}
