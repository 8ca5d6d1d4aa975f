//! Response envelopes.
//!
//! Every response body has one of two shapes:
//!
//! ```text
//! success: { "success": true,  "statusCode": 200, "message": "...", "data": ... }
//! error:   { "success": false, "message": "...", "errors": [...]?, "stack": "..."? }
//! ```
//!
//! # Invariants
//! - `success == (status < 400)` for every envelope, fixed at construction.
//! - Error envelopes are only built from a [`ClassifiedError`], whose status
//!   is always 4xx/5xx, so they never claim success.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};

use crate::error::{ClassifiedError, FailureStatus, FieldError};

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

/// Envelope for a handled request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(serialize_with = "serialize_status")]
    status_code: StatusCode,
    message: String,
    data: T,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn new(status_code: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            success: status_code.as_u16() < 400,
            status_code,
            message: message.into(),
            data,
        }
    }

    /// 200 OK.
    #[must_use]
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }

    /// 201 Created.
    #[must_use]
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, message)
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

/// Envelope for a failed request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    #[serde(skip)]
    status: FailureStatus,
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

impl ErrorEnvelope {
    #[must_use]
    pub const fn status(&self) -> FailureStatus {
        self.status
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }
}

impl From<ClassifiedError> for ErrorEnvelope {
    fn from(error: ClassifiedError) -> Self {
        Self {
            status: error.status(),
            success: false,
            message: error.message().to_string(),
            errors: error.errors().to_vec(),
            stack: error.trace().map(str::to_string),
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        (self.status.as_status(), Json(self)).into_response()
    }
}
