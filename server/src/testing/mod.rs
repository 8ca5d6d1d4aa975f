//! Shared builders for unit and end-to-end tests.

use std::sync::Arc;

use crate::auth::SigningSecret;
use crate::config::{OperatingMode, ServerConfig};
use crate::identity::{CredentialHasher, IdentityStore, MemoryIdentityStore};
use crate::state::AppState;

/// Secret every test server signs with.
pub const TEST_SECRET: &[u8] = b"campus-test-secret-that-is-long-enough";

/// Argon2 hasher with the cheapest parameters Argon2 accepts.
#[must_use]
pub fn cheap_hasher() -> CredentialHasher {
    #[allow(clippy::expect_used)]
    CredentialHasher::with_params(256, 1, 1).expect("valid argon2 params")
}

/// Configuration for a test server in `mode`.
#[must_use]
pub fn test_config(mode: OperatingMode) -> ServerConfig {
    #[allow(clippy::expect_used)]
    let jwt_secret = SigningSecret::new(TEST_SECRET.to_vec()).expect("non-empty secret");
    ServerConfig {
        jwt_secret,
        token_ttl_secs: 3600,
        listen_port: 0,
        mode,
    }
}

/// Application state over a fresh in-memory store.
///
/// The store is returned too so tests can seed or inspect it directly.
#[must_use]
#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
pub fn test_state(mode: OperatingMode) -> (AppState, Arc<MemoryIdentityStore>) {
    let store = Arc::new(MemoryIdentityStore::with_hasher(cheap_hasher()));
    let shared: Arc<dyn IdentityStore> = store.clone();
    let state = AppState::new(&test_config(mode), shared);
    (state, store)
}
