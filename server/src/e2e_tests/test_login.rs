//! Test login over HTTP.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;
use crate::time::Clock;

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new();
    let principal = app.register("a@x.com", "pw123456").await;

    let token = app.login("a@x.com", "pw123456").await;

    assert_eq!(
        app.services.tokens.verify(&token, app.services.clock.now()),
        Ok(principal.id)
    );
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();
    app.register("a@x.com", "pw123456").await;

    let wrong_password = app
        .post_form("/auth/login", &login_form("a@x.com", "wrongpass"))
        .await;
    let unknown_email = app
        .post_form("/auth/login", &login_form("nobody@x.com", "pw123456"))
        .await;

    assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.detail(), Some("Incorrect email or password"));
}

#[tokio::test]
async fn test_login_requires_form_body() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/auth/login",
            &serde_json::json!({ "username": "a@x.com", "password": "pw123456" }),
            None,
        )
        .await;

    assert!(response.status.is_client_error());
}
