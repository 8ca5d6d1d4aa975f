//! Current-identity scenarios.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_me_with_login_token() {
    let test = TestClient::new();
    let (id, _) = test.register_john();
    let login = test.login("john@example.com", "password123");
    let token = login.body["data"]["token"].as_str().unwrap();

    let resp = test.me(token);

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.success());
    assert_eq!(resp.message(), "User retrieved successfully");
    assert_eq!(resp.body["data"], login.body["data"]["user"]);
    assert_eq!(resp.body["data"]["_id"], id.as_str());
}

#[test]
fn test_me_payload_matches_store_without_secret() {
    let test = TestClient::new();
    let (id, token) = test.register_john();

    let resp = test.me(&token);

    let stored = test
        .runtime
        .block_on(async {
            use crate::identity::IdentityStore;
            test.store.find_by_id(id.parse().unwrap()).await
        })
        .unwrap()
        .unwrap();
    assert_eq!(resp.body["data"], serde_json::to_value(&stored).unwrap());

    let user = resp.body["data"].as_object().unwrap();
    assert_eq!(user.len(), 6);
    assert!(!user.contains_key("password"));
}

#[test]
fn test_me_without_header() {
    let test = TestClient::new();
    test.register_john();

    let resp = test.get("/api/auth/me", None);

    assert_not_authorized(&resp);
}

#[test]
fn test_me_after_deactivation() {
    let test = TestClient::new();
    let (id, token) = test.register_john();
    test.store
        .set_active(id.parse().unwrap(), false)
        .unwrap()
        .unwrap();

    let resp = test.me(&token);

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert!(!resp.success());
    assert_eq!(resp.message(), DEACTIVATED);
}

#[test]
fn test_me_after_reactivation() {
    let test = TestClient::new();
    let (id, token) = test.register_john();
    let id = id.parse().unwrap();
    test.store.set_active(id, false).unwrap();
    test.store.set_active(id, true).unwrap();

    let resp = test.me(&token);

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["isActive"], true);
}
