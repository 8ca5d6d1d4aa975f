//! In-memory identity store.
//!
//! A thread-safe [`IdentityStore`] keeping every record in process memory.
//!
//! # Thread Safety
//!
//! The tables sit behind one `RwLock`:
//! - Lookups take a read lock and clone out what they return
//! - Creation and status changes take the write lock
//! - Password hashing runs on the blocking pool before any lock is taken
//!
//! # Invariants
//!
//! - Each email maps to exactly one identity id
//! - Records are never removed for the lifetime of the store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    AuthenticatedIdentity, CredentialHasher, CredentialRecord, IdentityStore, NewIdentity,
    StoreError, normalize_email,
};

#[derive(Default)]
struct Tables {
    by_id: HashMap<Uuid, CredentialRecord>,
    id_by_email: HashMap<String, Uuid>,
}

/// Identity store backed by process memory.
#[derive(Default)]
pub struct MemoryIdentityStore {
    tables: RwLock<Tables>,
    hasher: CredentialHasher,
}

impl MemoryIdentityStore {
    /// Create an empty store that hashes with default Argon2 parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a custom hasher.
    #[must_use]
    pub fn with_hasher(hasher: CredentialHasher) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            hasher,
        }
    }

    /// Number of stored identities.
    ///
    /// # Errors
    ///
    /// Returns an error if the table lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.by_id.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Switch an identity's account on or off.
    ///
    /// Returns the updated identity, or `None` if no record has `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table lock is poisoned.
    pub fn set_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Option<AuthenticatedIdentity>, StoreError> {
        let mut tables = self.write()?;
        let updated = tables.by_id.get_mut(&id).map(|record| {
            record.identity.is_active = active;
            record.identity.clone()
        });
        drop(tables);

        if let Some(identity) = &updated {
            tracing::info!(identity = %identity.id, active, "identity status changed");
        }
        Ok(updated)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("identity table lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("identity table lock poisoned".to_string()))
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let email = normalize_email(email);
        let tables = self.read()?;
        Ok(tables
            .id_by_email
            .get(&email)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthenticatedIdentity>, StoreError> {
        let tables = self.read()?;
        Ok(tables.by_id.get(&id).map(|record| record.identity.clone()))
    }

    async fn create(&self, fields: NewIdentity) -> Result<AuthenticatedIdentity, StoreError> {
        let email = normalize_email(&fields.email);
        let hasher = self.hasher.clone();
        let password = fields.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| StoreError::Unavailable(format!("hashing task failed: {e}")))?
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let identity = AuthenticatedIdentity {
            id: Uuid::new_v4(),
            name: fields.name.trim().to_string(),
            email: email.clone(),
            role: fields.role,
            is_active: true,
            created_at: Utc::now(),
        };

        // Check and insert under one write lock so concurrent registrations
        // cannot both claim the same email.
        let mut tables = self.write()?;
        if tables.id_by_email.contains_key(&email) {
            return Err(StoreError::DuplicateKey {
                field: "email".to_string(),
            });
        }
        tables.id_by_email.insert(email, identity.id);
        tables.by_id.insert(
            identity.id,
            CredentialRecord {
                identity: identity.clone(),
                password_hash,
            },
        );
        drop(tables);

        tracing::debug!(identity = %identity.id, role = %identity.role, "identity created");
        Ok(identity)
    }
}
