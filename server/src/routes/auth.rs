//! Credential routes: registration, login and the current identity.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::{CurrentIdentity, require_auth};
use crate::envelope::ApiResponse;
use crate::error::Failure;
use crate::identity::AuthenticatedIdentity;
use crate::state::AppState;
use crate::validation::{LoginRequest, RegisterRequest, validate_login, validate_registration};

/// `data` of a successful registration or login.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: AuthenticatedIdentity,
    pub token: String,
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(state, require_auth))
        .route("/register", post(register))
        .route("/login", post(login))
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiResponse<AuthPayload>, Failure> {
    let Json(body) = body?;
    let fields = validate_registration(body)?;

    let user = state.store.create(fields).await?;
    let token = state.signer.issue(&user.id.to_string())?;

    tracing::info!(identity = %user.id, role = %user.role, "user registered");
    Ok(ApiResponse::created(
        AuthPayload { user, token },
        "User registered successfully",
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResponse<AuthPayload>, Failure> {
    let Json(body) = body?;
    let credentials = validate_login(body)?;

    let record = state
        .store
        .find_by_email(&credentials.email)
        .await?
        .ok_or(Failure::CredentialMismatch)?;

    if !record.identity.is_active {
        return Err(Failure::AccountDeactivated);
    }

    let candidate = credentials.password;
    let (record, matched) = tokio::task::spawn_blocking(move || {
        let matched = record.compare_password(&candidate);
        (record, matched)
    })
    .await
    .map_err(Failure::internal)?;

    if !matched {
        return Err(Failure::CredentialMismatch);
    }

    let user = record.into_identity();
    let token = state.signer.issue(&user.id.to_string())?;

    tracing::info!(identity = %user.id, "user logged in");
    Ok(ApiResponse::ok(AuthPayload { user, token }, "Login successful"))
}

/// `GET /api/auth/me`
pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> ApiResponse<AuthenticatedIdentity> {
    ApiResponse::ok(identity, "User retrieved successfully")
}
