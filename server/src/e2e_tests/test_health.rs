//! Health check.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_health() {
    let test = TestClient::new();

    let resp = test.get("/api/health", None);

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.success());
    assert_eq!(resp.message(), "Server is healthy");
    assert!(resp.body["data"]["timestamp"].is_string());
}
