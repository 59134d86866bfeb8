//! Walk through the full register, login, resolve and document flow.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_register_login_create_and_isolate() {
    let app = TestApp::new();

    let alice = app.register("a@x.com", "pw123456").await;
    assert_eq!(alice.id, 1);

    let token = app.login("a@x.com", "pw123456").await;

    let me = app.get("/auth/me", Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body, json!({ "id": 1, "email": "a@x.com" }));

    let document = app.create_document(&token, "T", "C").await;
    assert_eq!(document["id"], json!(1));
    assert_eq!(document["owner_id"], json!(1));

    let bob = app.register("b@x.com", "pw123456").await;
    assert_eq!(bob.id, 2);
    let bob_token = app.login("b@x.com", "pw123456").await;

    let response = app.get("/documents/1", Some(&bob_token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
