//! Authentication middleware.
//!
//! Authentication is an explicit pipeline of steps, each either advancing to
//! the next stage or rejecting:
//!
//! ```text
//! Start ──verify──▶ TokenChecked ──resolve──▶ IdentityResolved ──active?──▶ Attached
//!   │                   │                           │
//!   └───────────────────┴─────────── Rejected ◀─────┘
//! ```
//!
//! # Post-conditions
//! - On success the request carries a [`CurrentIdentity`] extension and
//!   nothing else is changed.
//! - On rejection the client sees `NotAuthorized`, except for a deactivated
//!   account which is reported as `AccountDeactivated`. Both are 401.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::extract_bearer_token;
use crate::error::Failure;
use crate::identity::AuthenticatedIdentity;
use crate::state::AppState;

/// Stage reached by an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Start,
    TokenChecked,
    IdentityResolved,
    Attached,
}

impl std::fmt::Display for AuthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::TokenChecked => "token_checked",
            Self::IdentityResolved => "identity_resolved",
            Self::Attached => "attached",
        };
        f.write_str(name)
    }
}

/// A failed authentication attempt: the last stage reached and why it stopped.
#[derive(Debug)]
pub struct AuthRejection {
    pub stage: AuthStage,
    pub failure: Failure,
}

impl AuthRejection {
    fn at(stage: AuthStage) -> impl FnOnce(Failure) -> Self {
        move |failure| Self { stage, failure }
    }

    /// The failure an unauthenticated caller is allowed to see.
    #[must_use]
    pub fn into_failure(self) -> Failure {
        match self.failure {
            Failure::AccountDeactivated => Failure::AccountDeactivated,
            _ => Failure::NotAuthorized,
        }
    }
}

/// Run the authentication pipeline against request headers.
///
/// The returned rejection keeps the internal reason; callers decide what
/// reaches the client via [`AuthRejection::into_failure`].
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedIdentity, AuthRejection> {
    let claim = state
        .verifier
        .verify(extract_bearer_token(headers))
        .map_err(AuthRejection::at(AuthStage::Start))?;

    let identity = state
        .resolver
        .resolve(&claim.subject)
        .await
        .map_err(AuthRejection::at(AuthStage::TokenChecked))?;

    if !identity.is_active {
        return Err(AuthRejection {
            stage: AuthStage::IdentityResolved,
            failure: Failure::AccountDeactivated,
        });
    }

    Ok(identity)
}

/// Middleware guarding protected routes.
///
/// Install with `route_layer(from_fn_with_state(state, require_auth))`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Failure> {
    let identity = match authenticate(&state, request.headers()).await {
        Ok(identity) => identity,
        Err(rejection) => {
            tracing::debug!(
                stage = %rejection.stage,
                reason = %rejection.failure,
                "authentication rejected"
            );
            return Err(rejection.into_failure());
        }
    };

    tracing::debug!(identity = %identity.id, stage = %AuthStage::Attached, "identity attached");
    request.extensions_mut().insert(CurrentIdentity(identity));
    Ok(next.run(request).await)
}

/// Extractor for the identity attached by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(Failure::NotAuthorized)
    }
}
