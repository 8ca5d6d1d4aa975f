//! `success == (status < 400)` for every response the service can produce.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::config::OperatingMode;
use crate::e2e_tests::helpers::*;

fn assert_envelope(resp: &TestResponse) {
    let success = resp.body["success"]
        .as_bool()
        .unwrap_or_else(|| panic!("missing success flag: {:?}", resp.body));
    assert_eq!(success, resp.status.as_u16() < 400, "{:?}", resp.body);
    assert!(resp.body["message"].is_string(), "{:?}", resp.body);
    if success {
        assert_eq!(resp.body["statusCode"], resp.status.as_u16());
        assert!(resp.body.get("data").is_some());
    } else {
        assert!(resp.body.get("data").is_none());
    }
}

#[test]
fn test_every_outcome_is_enveloped() {
    let test = TestClient::new();
    let (_, token) = test.register_john();

    let responses = [
        test.register(&json!({
            "name": "Jane Roe",
            "email": "jane@example.com",
            "password": "password123",
            "role": "faculty",
        })),
        test.register(&john()),
        test.register(&json!({})),
        test.login("john@example.com", "password123"),
        test.login("john@example.com", "wrong-password"),
        test.me(&token),
        test.me("garbage"),
        test.get("/api/auth/me", None),
        test.get("/api/health", None),
        test.get("/api/nowhere", None),
        test.get("/api/auth/login", None),
    ];

    for resp in &responses {
        assert_envelope(resp);
    }
}

#[test]
fn test_unknown_route() {
    let test = TestClient::new();

    let resp = test.get("/api/courses", None);

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), "Not Found - /api/courses");
}

#[test]
fn test_wrong_method() {
    let test = TestClient::new();

    let resp = test.send(
        Request::builder()
            .method("DELETE")
            .uri("/api/auth/register")
            .body(Body::empty())
            .unwrap(),
    );

    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(!resp.success());
    assert_eq!(resp.message(), "Method Not Allowed");
}

#[test]
fn test_stack_only_outside_production() {
    let production = TestClient::new();
    let development = TestClient::with_mode(OperatingMode::Development);

    let prod = production.get("/api/auth/me", None);
    let dev = development.get("/api/auth/me", None);

    assert!(prod.body.get("stack").is_none());
    assert!(dev.body["stack"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(prod.message(), dev.message());
    assert_eq!(prod.status, dev.status);
}
