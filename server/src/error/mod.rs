//! Failure taxonomy.
//!
//! Every stage of the request pipeline raises a [`Failure`]. The variant is
//! chosen where the failure happens; nothing downstream inspects error names
//! or messages to decide what went wrong. Only the error boundary turns a
//! `Failure` into user-facing text, through [`classify`].
//!
//! # Invariants
//!
//! - Every `Failure` classifies to exactly one [`ClassifiedError`].
//! - User-facing text lives in the classifier, never in the variant payloads,
//!   except for `Unclassified::message` which is already client-safe.

pub mod boundary;
pub mod classify;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classify::{ClassifiedError, FailureStatus, classify};

/// Boxed foreign error kept only for diagnostics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single field-level problem reported alongside a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every way a request can fail.
#[derive(Debug, Error)]
pub enum Failure {
    /// No bearer token was presented.
    #[error("no bearer token supplied")]
    TokenMissing,
    /// The token failed its signature or structure check.
    #[error("token signature or structure is invalid")]
    TokenInvalid,
    /// The token's expiry timestamp has passed.
    #[error("token has expired")]
    TokenExpired,
    /// The token's subject has no matching identity record.
    #[error("no identity matches the token subject")]
    IdentityNotFound,
    /// The identity exists but its account is switched off.
    #[error("identity account is deactivated")]
    AccountDeactivated,
    /// Submitted email/password do not match a stored identity.
    #[error("submitted credentials do not match")]
    CredentialMismatch,
    /// Collapsed outcome of a rejected authentication attempt.
    #[error("request is not authorized")]
    NotAuthorized,
    /// A unique field already holds the submitted value.
    #[error("duplicate value for unique field `{field}`")]
    DuplicateField { field: String },
    /// One or more request fields failed validation.
    #[error("{} field(s) failed validation", .0.len())]
    FieldValidationFailed(Vec<FieldError>),
    /// Anything without a dedicated variant.
    #[error("{}", .message.as_deref().unwrap_or("unclassified failure"))]
    Unclassified {
        /// Status the raiser asked for, honored only if it is 4xx/5xx.
        status: Option<u16>,
        /// Client-safe message, if the raiser has one.
        message: Option<String>,
        /// Underlying cause, surfaced only in diagnostic traces.
        #[source]
        source: Option<BoxError>,
    },
    /// An already-classified error, passed through as is.
    #[error("{}", .0.message())]
    Classified(ClassifiedError),
}

impl Failure {
    /// An unclassified failure with an explicit status and message.
    #[must_use]
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Unclassified {
            status: Some(status),
            message: Some(message.into()),
            source: None,
        }
    }

    /// An internal failure whose cause must not reach the client.
    #[must_use]
    pub fn internal(source: impl Into<BoxError>) -> Self {
        Self::Unclassified {
            status: None,
            message: None,
            source: Some(source.into()),
        }
    }
}

impl From<ClassifiedError> for Failure {
    fn from(error: ClassifiedError) -> Self {
        Self::Classified(error)
    }
}

impl From<axum::extract::rejection::JsonRejection> for Failure {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::Unclassified {
            status: Some(rejection.status().as_u16()),
            message: Some(rejection.body_text()),
            source: Some(Box::new(rejection)),
        }
    }
}
