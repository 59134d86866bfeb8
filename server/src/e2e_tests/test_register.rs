//! Test account registration over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_register_returns_public_principal() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/auth/register",
            &json!({ "email": "a@x.com", "password": "pw123456" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body, json!({ "id": 1, "email": "a@x.com" }));
}

#[tokio::test]
async fn test_register_never_exposes_hash() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/auth/register",
            &json!({ "email": "a@x.com", "password": "pw123456" }),
            None,
        )
        .await;

    let body = response.body.to_string();
    assert!(!body.contains("password"));
    assert!(!body.contains("argon2"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("a@x.com", "pw123456").await;

    let response = app
        .post_json(
            "/auth/register",
            &json!({ "email": "a@x.com", "password": "different-pw" }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.detail(), Some("Email already registered"));

    // The original password still works; the second attempt changed nothing.
    app.login("a@x.com", "pw123456").await;
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new();

    let bad_email = app
        .post_json(
            "/auth/register",
            &json!({ "email": "not-an-email", "password": "pw123456" }),
            None,
        )
        .await;
    let short_password = app
        .post_json(
            "/auth/register",
            &json!({ "email": "a@x.com", "password": "pw" }),
            None,
        )
        .await;

    assert_eq!(bad_email.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(short_password.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        short_password
            .detail()
            .is_some_and(|detail| detail.contains("password"))
    );
}

#[tokio::test]
async fn test_register_missing_fields_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json("/auth/register", &json!({ "email": "a@x.com" }), None)
        .await;

    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_register_rejects_surrounding_whitespace() {
    let app = TestApp::new();

    for email in [" a@x.com", "a@x.com ", "\ta@x.com"] {
        let response = app
            .post_json(
                "/auth/register",
                &json!({ "email": email, "password": "pw123456" }),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::UNPROCESSABLE_ENTITY,
            "email {email:?}"
        );
    }

    // The address is stored exactly as given, so a padded login does not match.
    app.register("a@x.com", "pw123456").await;
    let response = app
        .post_form("/auth/login", &login_form(" a@x.com", "pw123456"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
