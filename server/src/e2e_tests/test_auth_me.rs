//! Test `/auth/me` and bearer token handling.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_me_returns_current_principal() {
    let app = TestApp::new();
    let (principal, token) = app.register_and_login("a@x.com", "pw123456").await;

    let response = app.get("/auth/me", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "id": principal.id, "email": "a@x.com" })
    );
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get("/auth/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
}

#[tokio::test]
async fn test_me_with_wrong_scheme_is_unauthorized() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;

    let request = Request::get("/auth/me")
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .body(Body::empty())
        .expect("build request");
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_tampered_token_is_unauthorized() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;
    let tampered = format!("{token}x");

    let response = app.get("/auth/me", Some(&tampered)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.detail(), Some("Invalid token"));
}

#[tokio::test]
async fn test_me_after_principal_deleted_is_unauthorized() {
    let app = TestApp::new();
    let (principal, token) = app.register_and_login("a@x.com", "pw123456").await;
    assert_eq!(app.get("/auth/me", Some(&token)).await.status, StatusCode::OK);

    assert!(
        app.services
            .store
            .delete_principal(principal.id)
            .expect("delete principal")
    );

    let response = app.get("/auth/me", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.detail(), Some("Invalid token"));
}
