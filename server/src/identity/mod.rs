//! Identity records and the persistence collaborator.
//!
//! The store is an external collaborator reached through [`IdentityStore`].
//! Its lookups return [`AuthenticatedIdentity`], a type with no secret field,
//! so a credential can only escape through [`CredentialRecord`], which is
//! returned solely by the email lookup used at login.
//!
//! # Invariants
//! - Emails are unique across the store.
//! - `AuthenticatedIdentity` never carries credential material.

pub mod memory;
pub mod password;
pub mod resolver;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::Failure;

pub use memory::MemoryIdentityStore;
pub use password::{CredentialHasher, PasswordError};
pub use resolver::IdentityResolver;

/// Closed set of roles an identity can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Student, Self::Faculty, Self::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or(())
    }
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedIdentity {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an identity. `password` is the plaintext candidate.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Identity together with its stored password hash.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub identity: AuthenticatedIdentity,
    pub password_hash: String,
}

impl CredentialRecord {
    /// Check `candidate` against the stored hash.
    #[must_use]
    pub fn compare_password(&self, candidate: &str) -> bool {
        password::verify_password(&self.password_hash, candidate)
    }

    /// Drop the credential, keeping only the public identity.
    #[must_use]
    pub fn into_identity(self) -> AuthenticatedIdentity {
        self.identity
    }
}

/// Errors raised by the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index already holds the submitted value.
    #[error("duplicate key for unique field `{field}`")]
    DuplicateKey { field: String },
    /// The store could not serve the request.
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for Failure {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateKey { field } => Self::DuplicateField { field },
            other @ StoreError::Unavailable(_) => Self::internal(other),
        }
    }
}

/// Lookup and creation of identity records.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find an identity and its credential by (normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError>;

    /// Find an identity by id. The result never includes the credential.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthenticatedIdentity>, StoreError>;

    /// Create an identity, hashing its password.
    ///
    /// # Errors
    /// `StoreError::DuplicateKey { field: "email" }` if the email is taken.
    async fn create(&self, fields: NewIdentity) -> Result<AuthenticatedIdentity, StoreError>;
}

/// Normalize an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
