//! Common helpers for end-to-end tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::api::{self, AppState, PrincipalPublic, TokenResponse};
use crate::testing::TestServices;

pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// A router wired to fresh test services.
pub struct TestApp {
    pub services: TestServices,
    router: Router,
}

/// Status, headers and parsed body of a response.
///
/// Non-JSON bodies are kept as a JSON string.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `detail` field of an error body.
    pub fn detail(&self) -> Option<&str> {
        self.body.get("detail").and_then(Value::as_str)
    }
}

impl TestApp {
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    pub fn new() -> Self {
        let services = TestServices::new();
        let state = AppState {
            auth: Arc::clone(&services.auth),
            identity: Arc::clone(&services.identity),
            documents: Arc::clone(&services.documents),
        };
        let router = api::router(state, &[ALLOWED_ORIGIN.to_string()]);
        Self { services, router }
    }

    /// Send a request through the router.
    #[allow(clippy::expect_used)]
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    #[allow(clippy::expect_used)]
    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let request = with_token(Request::get(uri), token)
            .body(Body::empty())
            .expect("build request");
        self.send(request).await
    }

    #[allow(clippy::expect_used)]
    pub async fn post_json(&self, uri: &str, body: &Value, token: Option<&str>) -> TestResponse {
        let request = with_token(Request::post(uri), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    #[allow(clippy::expect_used)]
    pub async fn put_json(&self, uri: &str, body: &Value, token: Option<&str>) -> TestResponse {
        let request = with_token(Request::put(uri), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    #[allow(clippy::expect_used)]
    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    /// Register through the API and return the public principal.
    #[allow(clippy::expect_used)]
    pub async fn register(&self, email: &str, password: &str) -> PrincipalPublic {
        let response = self
            .post_json(
                "/auth/register",
                &serde_json::json!({ "email": email, "password": password }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "register {email}");
        serde_json::from_value(response.body).expect("principal body")
    }

    /// Log in through the API and return the access token.
    #[allow(clippy::expect_used)]
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post_form("/auth/login", &login_form(email, password))
            .await;
        assert_eq!(response.status, StatusCode::OK, "login {email}");
        let token: TokenResponse = serde_json::from_value(response.body).expect("token body");
        assert_eq!(token.token_type, "bearer");
        token.access_token
    }

    /// Register and log in, returning the principal and its token.
    pub async fn register_and_login(&self, email: &str, password: &str) -> (PrincipalPublic, String) {
        let principal = self.register(email, password).await;
        let token = self.login(email, password).await;
        (principal, token)
    }

    /// Create a document and return its JSON body.
    pub async fn create_document(&self, token: &str, title: &str, content: &str) -> Value {
        let response = self
            .post_json(
                "/documents",
                &serde_json::json!({ "title": title, "content": content }),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "create {title}");
        response.body
    }
}

/// URL-encode a login form body. Test inputs only use `@`, `.` and alphanumerics.
pub fn login_form(email: &str, password: &str) -> String {
    format!(
        "username={}&password={}",
        email.replace('@', "%40"),
        password
    )
}

fn with_token(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}
