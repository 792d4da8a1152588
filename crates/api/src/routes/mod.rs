pub mod auth;
pub mod health;
pub mod inbox;
pub mod public;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /index                                  login bootstrap data (public)
/// /thanks                                 post-submission data (public)
/// /me                                     current session profile (auth)
///
/// /inbox                                  active notes (auth)
/// /inbox/archived                         archived notes (auth)
/// /inbox/export/{format}                  download notes (auth)
/// /inbox/enable                           accept notes (POST, auth)
/// /inbox/disable                          stop accepting notes (POST, auth)
/// /inbox/email/enable                     e-mail on new notes (POST, auth)
/// /inbox/email/disable                    no e-mail on new notes (POST, auth)
/// /inbox/notes/{uuid}/archive             archive a note (PATCH, auth)
///
/// /to/{slug}                              submission form data (public)
/// /to/{slug}/submit                       submit a note (POST, public)
/// /notes/{uuid}                           shared note (public)
/// ```
///
/// The OAuth endpoints and `/health` live at the root; see
/// [`auth::router`] and [`health::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/index", get(handlers::auth::index))
        .route("/thanks", get(handlers::auth::thanks))
        .route("/me", get(handlers::auth::me))
        .nest("/inbox", inbox::router())
        .merge(public::router())
}
