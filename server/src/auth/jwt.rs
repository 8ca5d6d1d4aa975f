//! JWT issuance and verification.
//!
//! Bearer tokens are HS256 JSON Web Tokens carrying `sub`, `iat` and `exp`.
//!
//! # Pre-conditions
//! - The signing secret is non-empty (guaranteed by [`SigningSecret`]).
//!
//! # Post-conditions
//! - On success, verification returns the claims of the token.
//! - On failure, verification returns exactly one of `TokenMissing`,
//!   `TokenInvalid` or `TokenExpired`.
//!
//! # Invariants
//! - Verification is stateless, in-memory and never touches persistence.
//! - The same inputs always produce the same outputs at a given instant.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};

use super::SigningSecret;
use crate::error::Failure;

/// Scheme prefix accepted in the `Authorization` header. Case-sensitive.
const BEARER_PREFIX: &str = "Bearer ";

/// Wire representation of the token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject claim containing the identity identifier.
    sub: String,
    /// Issued-at, seconds since the Unix epoch.
    iat: u64,
    /// Expiry, seconds since the Unix epoch.
    exp: u64,
}

/// Claims extracted from a verified token.
///
/// Lives only for the authentication step of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    /// Identifier of the identity the token was issued to.
    pub subject: String,
    /// Seconds since the Unix epoch at which the token was issued.
    pub issued_at: u64,
    /// Seconds since the Unix epoch after which the token is rejected.
    pub expires_at: u64,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Any other form, including a lowercase scheme or a missing space, is
/// treated as no token at all.
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
}

/// Verifies bearer tokens against the configured secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier bound to `secret`.
    ///
    /// Expiry is checked with zero leeway; `sub` and `exp` are required.
    #[must_use]
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw token and extract its claims.
    ///
    /// # Errors
    /// - `TokenMissing` if no token (or an empty one) was supplied.
    /// - `TokenExpired` if the signature is good but `exp` has passed.
    /// - `TokenInvalid` for every other signature or structure problem.
    pub fn verify(&self, raw_token: Option<&str>) -> Result<IdentityClaim, Failure> {
        let token = raw_token
            .filter(|token| !token.is_empty())
            .ok_or(Failure::TokenMissing)?;

        let token_data =
            decode::<Claims>(token, &self.key, &self.validation).map_err(map_jwt_error)?;
        let claims = token_data.claims;
        if claims.sub.is_empty() {
            return Err(Failure::TokenInvalid);
        }

        Ok(IdentityClaim {
            subject: claims.sub,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

/// Issues bearer tokens for authenticated identities.
pub struct TokenSigner {
    key: EncodingKey,
    ttl_secs: u64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &SigningSecret, ttl_secs: u64) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, Failure> {
        self.issue_at(subject, get_current_timestamp())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(&self, subject: &str, issued_at: u64) -> Result<String, Failure> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key).map_err(Failure::internal)
    }
}

/// Maps jsonwebtoken errors onto the token failure variants.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> Failure {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::ExpiredSignature => Failure::TokenExpired,
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidToken
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => Failure::TokenInvalid,
        _ => {
            tracing::debug!("unexpected token verification error: {error}");
            Failure::TokenInvalid
        }
    }
}
