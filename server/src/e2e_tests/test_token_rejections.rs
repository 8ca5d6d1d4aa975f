//! Every token failure collapses onto the same 401 response.

use jsonwebtoken::get_current_timestamp;
use uuid::Uuid;

use crate::auth::{SigningSecret, TokenSigner};
use crate::e2e_tests::helpers::*;

#[test]
fn test_wrong_scheme_is_missing_token() {
    let test = TestClient::new();
    let (_, token) = test.register_john();

    for header in [
        format!("bearer {token}"),
        format!("Token {token}"),
        format!("Bearer{token}"),
        token.clone(),
        "Bearer ".to_string(),
    ] {
        let resp = test.get("/api/auth/me", Some(&header));
        assert_not_authorized(&resp);
    }
}

#[test]
fn test_token_signed_with_other_secret() {
    let test = TestClient::new();
    let (id, _) = test.register_john();
    let other = SigningSecret::new(b"some-other-secret-entirely".to_vec()).unwrap();
    let forged = TokenSigner::new(&other, 3600).issue(&id).unwrap();

    assert_not_authorized(&test.me(&forged));
}

#[test]
fn test_expired_token() {
    let test = TestClient::new();
    let (id, _) = test.register_john();
    let expired = test
        .state
        .signer
        .issue_at(&id, get_current_timestamp() - 2 * 3600)
        .unwrap();

    assert_not_authorized(&test.me(&expired));
}

#[test]
fn test_malformed_token() {
    let test = TestClient::new();
    test.register_john();

    assert_not_authorized(&test.me("not-a-jwt"));
    assert_not_authorized(&test.me("a.b.c"));
}

#[test]
fn test_token_for_unknown_identity() {
    let test = TestClient::new();
    test.register_john();
    let orphan = test
        .state
        .signer
        .issue(&Uuid::new_v4().to_string())
        .unwrap();

    assert_not_authorized(&test.me(&orphan));
}

#[test]
fn test_rejections_are_indistinguishable() {
    let test = TestClient::new();
    let (id, _) = test.register_john();
    let expired = test
        .state
        .signer
        .issue_at(&id, get_current_timestamp() - 2 * 3600)
        .unwrap();

    let missing = test.get("/api/auth/me", None);
    let invalid = test.me("not-a-jwt");
    let expired = test.me(&expired);

    assert_eq!(missing.body, invalid.body);
    assert_eq!(missing.body, expired.body);
}
