//! Route definitions for the `/inbox` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::inbox;
use crate::state::AppState;

/// Routes mounted at `/inbox`. All require auth.
///
/// ```text
/// GET   /                       -> dashboard
/// GET   /archived               -> archived
/// GET   /export/{format}        -> export
/// POST  /enable                 -> enable_inbox
/// POST  /disable                -> disable_inbox
/// POST  /email/enable           -> enable_email
/// POST  /email/disable          -> disable_email
/// PATCH /notes/{uuid}/archive   -> archive_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inbox::dashboard))
        .route("/archived", get(inbox::archived))
        .route("/export/{format}", get(inbox::export))
        .route("/enable", post(inbox::enable_inbox))
        .route("/disable", post(inbox::disable_inbox))
        .route("/email/enable", post(inbox::enable_email))
        .route("/email/disable", post(inbox::disable_email))
        .route("/notes/{uuid}/archive", patch(inbox::archive_note))
}
