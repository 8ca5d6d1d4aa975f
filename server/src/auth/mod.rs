//! Authentication module.
//!
//! Establishes *who* is making a request: bearer tokens are verified, their
//! subject is resolved to a live identity, and the identity is attached to
//! the request before any protected handler runs.
//!
//! # Pre-conditions
//! - A non-empty signing secret is configured at start-up.
//!
//! # Post-conditions
//! - Authentication configuration is immutable once loaded.
//!
//! # Invariants
//! - The signing secret is only ever reached through the values built from it.

pub mod jwt;
pub mod middleware;
pub mod secret;

pub use jwt::{IdentityClaim, TokenSigner, TokenVerifier, extract_bearer_token};
pub use middleware::{AuthRejection, AuthStage, CurrentIdentity, authenticate, require_auth};
pub use secret::{SigningSecret, SigningSecretError};
