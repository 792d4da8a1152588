//! Route definitions for anonymous visitors.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Public routes, merged into `/api/v1`.
///
/// ```text
/// GET  /to/{slug}         -> show_submit_form
/// POST /to/{slug}/submit  -> submit_note
/// GET  /notes/{uuid}      -> share_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/to/{slug}", get(public::show_submit_form))
        .route("/to/{slug}/submit", post(public::submit_note))
        .route("/notes/{uuid}", get(public::share_note))
}
