//! Identity resolver.
//!
//! Turns the subject of a verified token into a live identity record.

use std::sync::Arc;

use uuid::Uuid;

use super::{AuthenticatedIdentity, IdentityStore};
use crate::error::Failure;

/// Resolves token subjects through the persistence collaborator.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    #[must_use]
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Resolve `subject` to its identity.
    ///
    /// # Errors
    /// - `IdentityNotFound` if the subject is not an identity id or no record
    ///   matches it.
    /// - Store failures are propagated as they were raised.
    pub async fn resolve(&self, subject: &str) -> Result<AuthenticatedIdentity, Failure> {
        let Ok(id) = Uuid::parse_str(subject) else {
            return Err(Failure::IdentityNotFound);
        };

        self.store
            .find_by_id(id)
            .await?
            .ok_or(Failure::IdentityNotFound)
    }
}
