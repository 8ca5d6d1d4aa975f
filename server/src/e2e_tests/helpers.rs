//! Common helpers for end-to-end tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::app;
use crate::config::OperatingMode;
use crate::identity::MemoryIdentityStore;
use crate::state::AppState;
use crate::testing::test_state;

/// Decoded response: status plus parsed JSON body.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn success(&self) -> bool {
        self.body["success"].as_bool().unwrap_or(true)
    }
}

/// An in-process server over a fresh in-memory store.
pub struct TestClient {
    pub router: Router,
    pub runtime: tokio::runtime::Runtime,
    pub state: AppState,
    pub store: Arc<MemoryIdentityStore>,
}

impl TestClient {
    /// Create a new production-mode test client with an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(OperatingMode::Production)
    }

    #[must_use]
    pub fn with_mode(mode: OperatingMode) -> Self {
        let (state, store) = test_state(mode);
        let router = app(state.clone());

        #[allow(clippy::expect_used)]
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");

        Self {
            router,
            runtime,
            state,
            store,
        }
    }

    /// Send a request and decode the response body as JSON.
    pub fn send(&self, request: Request<Body>) -> TestResponse {
        self.runtime.block_on(async {
            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .expect("router is infallible");
            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .expect("body collects")
                .to_bytes();
            let body = serde_json::from_slice(&bytes)
                .unwrap_or_else(|e| panic!("body is not JSON ({e}): {bytes:?}"));
            TestResponse { status, body }
        })
    }

    pub fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("valid request"),
        )
    }

    /// `GET uri`, with the `Authorization` header set verbatim when given.
    pub fn get(&self, uri: &str, authorization: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
    }

    pub fn me(&self, token: &str) -> TestResponse {
        self.get("/api/auth/me", Some(&format!("Bearer {token}")))
    }

    pub fn register(&self, body: &Value) -> TestResponse {
        self.post_json("/api/auth/register", body)
    }

    pub fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/api/auth/login",
            &json!({ "email": email, "password": password }),
        )
    }

    /// Register the canonical John Doe student and return `(id, token)`.
    pub fn register_john(&self) -> (String, String) {
        let resp = self.register(&john());
        assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
        (
            resp.body["data"]["user"]["_id"]
                .as_str()
                .expect("user id")
                .to_string(),
            resp.body["data"]["token"]
                .as_str()
                .expect("token")
                .to_string(),
        )
    }
}

/// Registration body used throughout the scenarios.
pub fn john() -> Value {
    json!({
        "name": "John Doe",
        "email": "john@example.com",
        "password": "password123",
        "role": "student",
    })
}

pub const NOT_AUTHORIZED: &str = "Not authorized to access this route";
pub const DEACTIVATED: &str = "Account is deactivated. Please contact admin.";

/// Assert the uniform collapsed 401 rejection.
pub fn assert_not_authorized(resp: &TestResponse) {
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED, "{:?}", resp.body);
    assert!(!resp.success());
    assert_eq!(resp.message(), NOT_AUTHORIZED);
    assert!(resp.body.get("errors").is_none());
    assert!(resp.body.get("stack").is_none());
}
