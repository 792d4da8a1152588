//! Handlers for anonymous visitors: the submission form, note submission
//! and shared notes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use saythanks_core::error::CoreError;
use saythanks_core::names::random_full_name;
use saythanks_core::sanitize::{body_html, clean_body, clean_byline};
use saythanks_core::slug::validate_slug;
use saythanks_core::types::Timestamp;
use saythanks_db::models::inbox::Inbox;
use saythanks_db::models::note::{CreateNote, Note};
use saythanks_db::repositories::{InboxRepo, NoteRepo};
use saythanks_notify::NoteEmail;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parse_note_uuid;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// What the submission form needs to render.
#[derive(Debug, Serialize)]
pub struct SubmitForm {
    pub slug: String,
    /// Random name the submitter may use as a byline.
    pub fake_name: String,
}

/// Request body for `POST /to/{slug}/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitNoteRequest {
    pub body: String,
    #[serde(default)]
    pub byline: String,
}

/// Acknowledgement of a submission.
#[derive(Debug, Serialize)]
pub struct SubmitAccepted {
    pub accepted: bool,
}

/// A note on its public share page.
#[derive(Debug, Serialize)]
pub struct SharedNoteView {
    pub uuid: Uuid,
    pub inbox_slug: String,
    pub body: String,
    pub body_html: String,
    pub byline: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/to/{slug}
pub async fn show_submit_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let inbox = open_inbox(&state, &slug).await?;

    Ok(Json(DataResponse {
        data: SubmitForm {
            slug: inbox.slug,
            fake_name: random_full_name(),
        },
    }))
}

/// POST /api/v1/to/{slug}/submit
///
/// Store an anonymous note. A body that is empty once cleaned is accepted
/// but not stored. Returns 202 either way.
pub async fn submit_note(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<SubmitNoteRequest>,
) -> AppResult<impl IntoResponse> {
    let inbox = open_inbox(&state, &slug).await?;

    let accepted = (
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: SubmitAccepted { accepted: true },
        }),
    );

    let body = clean_body(&input.body);
    if body.is_empty() {
        tracing::debug!(slug = %inbox.slug, "Dropping note with empty body");
        return Ok(accepted);
    }

    let note = NoteRepo::create(
        &state.pool,
        inbox.id,
        &CreateNote {
            body,
            byline: clean_byline(&input.byline),
        },
    )
    .await?;

    tracing::info!(slug = %inbox.slug, note = %note.uuid, "Note received");

    notify_owner(&state, &inbox, &note).await;

    Ok(accepted)
}

/// GET /api/v1/notes/{uuid}
pub async fn share_note(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let note_uuid = parse_note_uuid(&uuid)?;

    let note = NoteRepo::find_shared(&state.pool, note_uuid)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Note", note_uuid)))?;

    Ok(Json(DataResponse {
        data: SharedNoteView {
            body_html: body_html(&note.body),
            uuid: note.uuid,
            inbox_slug: note.inbox_slug,
            body: note.body,
            byline: note.byline,
            created_at: note.created_at,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Look up an inbox that currently accepts notes. Unknown, malformed and
/// disabled slugs are all reported as not found.
async fn open_inbox(state: &AppState, slug: &str) -> AppResult<Inbox> {
    let not_found = || AppError::Core(CoreError::not_found("Inbox", slug));

    validate_slug(slug).map_err(|_| not_found())?;

    InboxRepo::find_by_slug(&state.pool, slug)
        .await?
        .filter(|inbox| inbox.enabled)
        .ok_or_else(not_found)
}

/// E-mail the inbox owner about a new note when they asked for it.
///
/// Delivery failures are logged and otherwise ignored.
async fn notify_owner(state: &AppState, inbox: &Inbox, note: &Note) {
    if !inbox.email_enabled {
        return;
    }
    let (Some(mailer), Some(to)) = (state.mailer.as_ref(), inbox.email.as_deref()) else {
        return;
    };

    let email = NoteEmail {
        uuid: note.uuid,
        body: &note.body,
        byline: &note.byline,
    };
    if let Err(e) = mailer.deliver_note(to, &inbox.slug, &email).await {
        tracing::warn!(slug = %inbox.slug, error = %e, "Failed to send note notification");
    }
}
