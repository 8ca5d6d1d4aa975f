//! Signing secret for bearer tokens.
//!
//! # Pre-conditions
//! - The secret must be a valid, non-empty byte string.
//!
//! # Post-conditions
//! - `SigningSecret` instances are immutable once created.
//!
//! # Invariants
//! - The secret is never empty.
//! - The secret bytes never appear in `Debug` output.

use thiserror::Error;

/// Error returned when the signing secret is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SigningSecretError {
    /// The HS256 secret is empty.
    #[error("HS256 secret must not be empty")]
    Empty,
}

/// Shared HMAC-SHA256 secret used to sign and verify tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Create a new signing secret.
    ///
    /// # Errors
    /// Returns `SigningSecretError::Empty` if the secret is empty.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, SigningSecretError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SigningSecretError::Empty);
        }
        Ok(Self(secret))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret(<{} bytes redacted>)", self.0.len())
    }
}
