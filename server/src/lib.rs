#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
// Life of a request:
// 1. HTTP request comes in
// 2. Error boundary wraps everything below it
// 3. Protected routes run the authentication pipeline:
//     - Extract the bearer token
//     - Verify signature and expiry
//     - Resolve the subject to a live identity
//     - Reject deactivated accounts
//     - Attach the identity to the request
// 4. Handler runs and returns a success envelope or a failure
// 5. Failures are classified and leave as an error envelope
//
// System components:
//  - Token verifier / signer
//  - Identity store (persistence collaborator)
//  - Error classifier and boundary
//  - Response envelopes

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod routes;
pub mod state;
pub mod validation;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
pub(crate) mod testing;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Assemble the application router.
///
/// Layer order, outermost first:
/// `TraceLayer → error boundary → CatchPanicLayer → routes`.
#[allow(clippy::disallowed_methods)] // AppState::clone is cheap and expected
pub fn app(state: AppState) -> Router {
    let mode = state.mode;
    routes::router(state.clone())
        .fallback(error::boundary::route_not_found)
        .layer(CatchPanicLayer::custom(error::boundary::panic_failure))
        .layer(from_fn_with_state(mode, error::boundary::error_boundary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
