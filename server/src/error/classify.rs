//! Error classifier.
//!
//! Maps any [`Failure`] onto a [`ClassifiedError`]: a failure-range status
//! code, a client-facing message, ordered field sub-errors and, outside
//! production, a diagnostic trace.
//!
//! # Post-conditions
//! - `classify` is total and never panics.
//! - In [`OperatingMode::Production`] the returned value never has a trace.

use std::fmt::Write as _;

use axum::http::StatusCode;
use thiserror::Error;

use super::{Failure, FieldError};
use crate::config::OperatingMode;

/// Message shared by every collapsed authentication rejection.
pub const NOT_AUTHORIZED_MESSAGE: &str = "Not authorized to access this route";
/// Message for a deactivated account, deliberately distinguishable.
pub const ACCOUNT_DEACTIVATED_MESSAGE: &str = "Account is deactivated. Please contact admin.";
/// Fallback message for failures that carry none.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// An HTTP status guaranteed to be in the 4xx/5xx range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FailureStatus(StatusCode);

impl FailureStatus {
    pub const BAD_REQUEST: Self = Self(StatusCode::BAD_REQUEST);
    pub const UNAUTHORIZED: Self = Self(StatusCode::UNAUTHORIZED);
    pub const NOT_FOUND: Self = Self(StatusCode::NOT_FOUND);
    pub const INTERNAL_SERVER_ERROR: Self = Self(StatusCode::INTERNAL_SERVER_ERROR);

    /// Accepts `code` only if it is a 4xx or 5xx status.
    #[must_use]
    pub fn new(code: u16) -> Option<Self> {
        if !(400..=599).contains(&code) {
            return None;
        }
        StatusCode::from_u16(code).ok().map(Self)
    }

    #[must_use]
    pub const fn as_status(self) -> StatusCode {
        self.0
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0.as_u16()
    }
}

/// A failure normalized for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    status: FailureStatus,
    message: String,
    errors: Vec<FieldError>,
    trace: Option<String>,
}

impl ClassifiedError {
    #[must_use]
    pub fn new(status: FailureStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
            trace: None,
        }
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    #[must_use]
    pub const fn status(&self) -> FailureStatus {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    fn without_trace(mut self) -> Self {
        self.trace = None;
        self
    }
}

/// Classify a failure for the given operating mode.
#[must_use]
pub fn classify(failure: &Failure, mode: OperatingMode) -> ClassifiedError {
    let classified = match failure {
        Failure::Classified(classified) => {
            return if mode.exposes_diagnostics() {
                classified.clone()
            } else {
                classified.clone().without_trace()
            };
        }
        Failure::TokenMissing | Failure::NotAuthorized => {
            ClassifiedError::new(FailureStatus::UNAUTHORIZED, NOT_AUTHORIZED_MESSAGE)
        }
        Failure::TokenInvalid => ClassifiedError::new(FailureStatus::UNAUTHORIZED, "Invalid token"),
        Failure::TokenExpired => ClassifiedError::new(FailureStatus::UNAUTHORIZED, "Token expired"),
        Failure::IdentityNotFound => {
            ClassifiedError::new(FailureStatus::UNAUTHORIZED, "User not found")
        }
        Failure::AccountDeactivated => {
            ClassifiedError::new(FailureStatus::UNAUTHORIZED, ACCOUNT_DEACTIVATED_MESSAGE)
        }
        Failure::CredentialMismatch => {
            ClassifiedError::new(FailureStatus::UNAUTHORIZED, "Invalid credentials")
        }
        Failure::DuplicateField { field } => {
            ClassifiedError::new(FailureStatus::BAD_REQUEST, format!("{field} already exists"))
        }
        Failure::FieldValidationFailed(errors) => {
            ClassifiedError::new(FailureStatus::BAD_REQUEST, "Validation Error")
                .with_errors(errors.clone())
        }
        Failure::Unclassified {
            status, message, ..
        } => {
            let status = status
                .and_then(FailureStatus::new)
                .unwrap_or(FailureStatus::INTERNAL_SERVER_ERROR);
            let message = message
                .clone()
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| INTERNAL_SERVER_ERROR_MESSAGE.to_string());
            ClassifiedError::new(status, message)
        }
    };

    if mode.exposes_diagnostics() {
        classified.with_trace(diagnostic_trace(failure))
    } else {
        classified
    }
}

/// Render the failure and its `source()` chain, one cause per line.
fn diagnostic_trace(failure: &Failure) -> String {
    let mut trace = failure.to_string();
    let mut source = std::error::Error::source(failure);
    while let Some(cause) = source {
        let _ = write!(trace, "\n  caused by: {cause}");
        source = cause.source();
    }
    trace
}
