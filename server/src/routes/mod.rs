//! HTTP routes.
//!
//! | Method | Path                 | Auth   |
//! |--------|----------------------|--------|
//! | POST   | `/api/auth/register` | public |
//! | POST   | `/api/auth/login`    | public |
//! | GET    | `/api/auth/me`       | Bearer |
//! | GET    | `/api/health`        | public |

pub mod auth;
pub mod health;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// All API routes, mounted under `/api`.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router(state))
        .route("/api/health", get(health::health))
}
