//! Shared application state.

use std::sync::Arc;

use crate::auth::{TokenSigner, TokenVerifier};
use crate::config::{OperatingMode, ServerConfig};
use crate::identity::{IdentityResolver, IdentityStore};

/// State shared by every request.
///
/// Everything here is read-only after start-up except the store, which is
/// responsible for its own synchronization.
#[derive(Clone)]
#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
pub struct AppState {
    /// Persistence collaborator for identity records.
    pub store: Arc<dyn IdentityStore>,
    /// Resolves token subjects through `store`.
    pub resolver: IdentityResolver,
    /// Verifies bearer tokens against the configured secret.
    pub verifier: Arc<TokenVerifier>,
    /// Issues tokens on registration and login.
    pub signer: Arc<TokenSigner>,
    /// Gates diagnostic traces in error envelopes.
    pub mode: OperatingMode,
}

impl AppState {
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    pub fn new(config: &ServerConfig, store: Arc<dyn IdentityStore>) -> Self {
        Self {
            resolver: IdentityResolver::new(Arc::clone(&store)),
            store,
            verifier: Arc::new(TokenVerifier::new(&config.jwt_secret)),
            signer: Arc::new(TokenSigner::new(&config.jwt_secret, config.token_ttl_secs)),
            mode: config.mode,
        }
    }
}
