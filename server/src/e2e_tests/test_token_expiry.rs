//! Test that tokens stop working once their TTL has passed.

use axum::http::StatusCode;
use chrono::TimeDelta;

use crate::e2e_tests::helpers::*;
use crate::testing::TEST_TOKEN_TTL_MINUTES;

#[tokio::test]
async fn test_token_valid_until_ttl_then_rejected() {
    let app = TestApp::new();
    let (_, token) = app.register_and_login("a@x.com", "pw123456").await;

    app.services
        .clock
        .advance(TimeDelta::minutes(TEST_TOKEN_TTL_MINUTES) - TimeDelta::seconds(1));
    assert_eq!(app.get("/documents", Some(&token)).await.status, StatusCode::OK);

    app.services.clock.advance(TimeDelta::seconds(2));
    let response = app.get("/documents", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // A fresh login works again.
    let fresh = app.login("a@x.com", "pw123456").await;
    assert_eq!(app.get("/documents", Some(&fresh)).await.status, StatusCode::OK);
}
