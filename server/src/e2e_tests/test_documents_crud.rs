//! Test document create, read, update and list over HTTP.

use axum::http::StatusCode;
use chrono::TimeDelta;
use serde_json::{Value, json};

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_create_then_get_document() {
    let app = TestApp::new();
    let (principal, token) = app.register_and_login("a@x.com", "pw123456").await;

    let created = app.create_document(&token, "Notes", "First draft").await;
    assert_eq!(created["id"], json!(1));
    assert_eq!(created["title"], json!("Notes"));
    assert_eq!(created["content"], json!("First draft"));
    assert_eq!(created["owner_id"], json!(principal.id));
    assert_eq!(created["created_at"], created["updated_at"]);
    assert_eq!(created["created_at"], json!("2026-01-01T00:00:00Z"));

    let fetched = app.get("/documents/1", Some(&token)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created);
}

#[tokio::test]
async fn test_create_ignores_client_supplied_owner() {
    let app = TestApp::new();
    let (alice, alice_token) = app.register_and_login("alice@x.com", "pw123456").await;
    let (bob, _) = app.register_and_login("bob@x.com", "pw123456").await;

    let response = app
        .post_json(
            "/documents",
            &json!({ "title": "T", "content": "C", "owner_id": bob.id }),
            Some(&alice_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["owner_id"], json!(alice.id));
}

#[tokio::test]
async fn test_create_requires_token() {
    let app = TestApp::new();

    let response = app
        .post_json("/documents", &json!({ "title": "T", "content": "C" }), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_validates_fields() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;

    let empty_title = app
        .post_json("/documents", &json!({ "title": "", "content": "C" }), Some(&token))
        .await;
    let long_title = app
        .post_json(
            "/documents",
            &json!({ "title": "t".repeat(201), "content": "C" }),
            Some(&token),
        )
        .await;
    let empty_content = app
        .post_json("/documents", &json!({ "title": "T", "content": "" }), Some(&token))
        .await;

    assert_eq!(empty_title.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(long_title.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(empty_content.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_is_partial() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;
    let created = app.create_document(&token, "Title", "Body").await;

    app.services.clock.advance(TimeDelta::seconds(90));
    let response = app
        .put_json("/documents/1", &json!({ "content": "New body" }), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], json!("Title"));
    assert_eq!(response.body["content"], json!("New body"));
    assert_eq!(response.body["created_at"], created["created_at"]);
    assert_eq!(response.body["updated_at"], json!("2026-01-01T00:01:30Z"));

    let response = app
        .put_json(
            "/documents/1",
            &json!({ "title": "New title", "content": null }),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], json!("New title"));
    assert_eq!(response.body["content"], json!("New body"));
}

#[tokio::test]
async fn test_update_missing_document_not_found() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;

    let response = app
        .put_json("/documents/42", &json!({ "title": "x" }), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.detail(), Some("Document not found"));
}

#[tokio::test]
async fn test_list_most_recently_updated_first() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;

    app.create_document(&token, "one", "1").await;
    app.services.clock.advance(TimeDelta::seconds(1));
    app.create_document(&token, "two", "2").await;
    app.services.clock.advance(TimeDelta::seconds(1));
    app.create_document(&token, "three", "3").await;

    app.services.clock.advance(TimeDelta::seconds(1));
    let touched = app
        .put_json("/documents/1", &json!({ "title": "one (edited)" }), Some(&token))
        .await;
    assert_eq!(touched.status, StatusCode::OK);

    let response = app.get("/documents", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let titles: Vec<&str> = response
        .body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|doc| doc["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["one (edited)", "three", "two"]);
}

#[tokio::test]
async fn test_list_empty() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;

    let response = app.get("/documents", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Value::Array(vec![]));
}

#[tokio::test]
async fn test_non_numeric_document_id_rejected() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;

    let response = app.get("/documents/abc", Some(&token)).await;

    assert!(response.status.is_client_error());
}
