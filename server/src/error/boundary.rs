//! Error boundary.
//!
//! The outermost application middleware. Every failure, whichever stage
//! raised it, leaves the service through [`error_boundary`]:
//!
//! 1. Handlers and inner middleware return a [`Failure`]; its `IntoResponse`
//!    impl renders a production-safe envelope and records the failure in the
//!    response extensions.
//! 2. A panicking handler is caught by `CatchPanicLayer` and turned into an
//!    internal failure by [`panic_failure`].
//! 3. The boundary re-classifies the recorded failure for the configured
//!    [`OperatingMode`] and emits the final error envelope.
//! 4. Any other `>= 400` response (axum's own 405, for example) is normalized
//!    into an error envelope as well.
//!
//! # Invariants
//! - Every response leaving the boundary with a 4xx/5xx status has an error
//!   envelope body.

use std::any::Any;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Uri, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::classify::INTERNAL_SERVER_ERROR_MESSAGE;
use super::{Failure, classify};
use crate::config::OperatingMode;
use crate::envelope::ErrorEnvelope;

/// Failure recorded on a response for the boundary to render.
#[derive(Clone)]
struct RaisedFailure(Arc<Failure>);

/// Payload of a caught handler panic.
#[derive(Debug, Error)]
#[error("handler panicked: {0}")]
struct HandlerPanicked(String);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response =
            ErrorEnvelope::from(classify(&self, OperatingMode::Production)).into_response();
        response
            .extensions_mut()
            .insert(RaisedFailure(Arc::new(self)));
        response
    }
}

/// Middleware that renders every failure as an error envelope.
pub async fn error_boundary(
    State(mode): State<OperatingMode>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let status = response.status();
    let failure = match response.extensions().get::<RaisedFailure>() {
        Some(RaisedFailure(failure)) => Arc::clone(failure),
        None if status.is_client_error() || status.is_server_error() => {
            Arc::new(Failure::with_status(
                status.as_u16(),
                status
                    .canonical_reason()
                    .unwrap_or(INTERNAL_SERVER_ERROR_MESSAGE),
            ))
        }
        None => return response,
    };

    let classified = classify(&failure, mode);
    if classified.status().as_status().is_server_error() {
        tracing::error!(
            %method,
            path = %path,
            status = classified.status().as_u16(),
            error = %failure,
            "request failed"
        );
    } else {
        tracing::debug!(
            %method,
            path = %path,
            status = classified.status().as_u16(),
            error = %failure,
            "request rejected"
        );
    }

    let (parts, _body) = response.into_parts();
    let mut rendered = ErrorEnvelope::from(classified).into_response();
    for (name, value) in &parts.headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rendered.headers_mut().append(name.clone(), value.clone());
        }
    }
    rendered
}

/// `CatchPanicLayer` hook: a panic becomes an internal failure.
///
/// The panic message is kept as the failure's source, so it only shows up in
/// non-production traces.
#[must_use]
pub fn panic_failure(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "non-string panic payload".to_string());
    tracing::error!(detail = %detail, "handler panicked");
    Failure::internal(HandlerPanicked(detail)).into_response()
}

/// Fallback for paths no route matches.
pub async fn route_not_found(uri: Uri) -> Failure {
    Failure::with_status(404, format!("Not Found - {}", uri.path()))
}
