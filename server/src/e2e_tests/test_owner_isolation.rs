//! Test that principals only ever see and modify their own documents.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_other_principal_cannot_read_document() {
    let app = TestApp::new();
    let (_, alice) = app.register_and_login("alice@x.com", "pw123456").await;
    let (_, bob) = app.register_and_login("bob@x.com", "pw123456").await;
    app.create_document(&alice, "Private", "Alice only").await;

    let foreign = app.get("/documents/1", Some(&bob)).await;
    let missing = app.get("/documents/999", Some(&bob)).await;

    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(foreign.body, missing.body);
}

#[tokio::test]
async fn test_other_principal_cannot_update_document() {
    let app = TestApp::new();
    let (_, alice) = app.register_and_login("alice@x.com", "pw123456").await;
    let (_, bob) = app.register_and_login("bob@x.com", "pw123456").await;
    let created = app.create_document(&alice, "Private", "Alice only").await;

    let response = app
        .put_json("/documents/1", &json!({ "title": "Hijacked" }), Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let unchanged = app.get("/documents/1", Some(&alice)).await;
    assert_eq!(unchanged.status, StatusCode::OK);
    assert_eq!(unchanged.body, created);
}

#[tokio::test]
async fn test_list_only_shows_own_documents() {
    let app = TestApp::new();
    let (alice_principal, alice) = app.register_and_login("alice@x.com", "pw123456").await;
    let (bob_principal, bob) = app.register_and_login("bob@x.com", "pw123456").await;

    app.create_document(&alice, "a1", "x").await;
    app.create_document(&bob, "b1", "x").await;
    app.create_document(&alice, "a2", "x").await;

    let alice_docs = app.get("/documents", Some(&alice)).await;
    let bob_docs = app.get("/documents", Some(&bob)).await;

    let owners = |body: &serde_json::Value| -> Vec<i64> {
        body.as_array()
            .expect("array body")
            .iter()
            .filter_map(|doc| doc["owner_id"].as_i64())
            .collect()
    };
    assert_eq!(owners(&alice_docs.body), vec![alice_principal.id, alice_principal.id]);
    assert_eq!(owners(&bob_docs.body), vec![bob_principal.id]);
}
