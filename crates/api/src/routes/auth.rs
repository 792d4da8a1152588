//! Route definitions for the OAuth login flow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at the root (not under `/api/v1`), since the identity
/// provider redirects the browser straight to `/callback`.
///
/// ```text
/// GET  /auth/login   -> login
/// POST /auth/logout  -> logout (requires auth)
/// GET  /callback     -> callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/callback", get(auth::callback))
}
