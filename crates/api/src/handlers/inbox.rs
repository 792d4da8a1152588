//! Handlers for the owner's inbox dashboard.
//!
//! Every handler resolves the inbox from the session's identity-provider
//! subject; a logged-in user without an inbox gets 404.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use saythanks_core::error::CoreError;
use saythanks_core::export::{build_csv, ExportFormat};
use saythanks_core::sanitize::body_html;
use saythanks_core::types::Timestamp;
use saythanks_db::models::inbox::Inbox;
use saythanks_db::models::note::Note;
use saythanks_db::repositories::{InboxRepo, NoteRepo};
use serde::Serialize;
use uuid::Uuid;

use super::parse_note_uuid;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Owner-facing view of an inbox.
#[derive(Debug, Serialize)]
pub struct InboxView {
    pub slug: String,
    pub enabled: bool,
    pub email_enabled: bool,
    /// Public URL at which the inbox accepts notes.
    pub share_url: String,
    pub created_at: Timestamp,
}

impl InboxView {
    fn new(state: &AppState, inbox: &Inbox) -> Self {
        Self {
            slug: inbox.slug.clone(),
            enabled: inbox.enabled,
            email_enabled: inbox.email_enabled,
            share_url: state.config.inbox_share_url(&inbox.slug),
            created_at: inbox.created_at,
        }
    }
}

/// A note as shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct NoteView {
    pub uuid: Uuid,
    pub body: String,
    /// Escaped body with `<br>` line breaks.
    pub body_html: String,
    pub byline: String,
    pub archived: bool,
    pub created_at: Timestamp,
}

impl From<Note> for NoteView {
    fn from(note: Note) -> Self {
        Self {
            body_html: body_html(&note.body),
            uuid: note.uuid,
            body: note.body,
            byline: note.byline,
            archived: note.archived,
            created_at: note.created_at,
        }
    }
}

/// Payload of the active and archived dashboards.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub user: AuthUser,
    pub inbox: InboxView,
    pub notes: Vec<NoteView>,
    pub is_enabled: bool,
    pub is_email_enabled: bool,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/inbox
///
/// Active notes, newest first.
pub async fn dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    build_dashboard(auth, &state, false).await
}

/// GET /api/v1/inbox/archived
///
/// Archived notes, newest first.
pub async fn archived(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    build_dashboard(auth, &state, true).await
}

async fn build_dashboard(
    auth: AuthUser,
    state: &AppState,
    archived: bool,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let inbox = owner_inbox(state, &auth).await?;
    let notes = NoteRepo::list_for_inbox(&state.pool, inbox.id, archived).await?;

    Ok(Json(DataResponse {
        data: Dashboard {
            inbox: InboxView::new(state, &inbox),
            notes: notes.into_iter().map(NoteView::from).collect(),
            is_enabled: inbox.enabled,
            is_email_enabled: inbox.email_enabled,
            user: auth,
        },
    }))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/v1/inbox/export/{format}
///
/// Download every note in the inbox, oldest first, as an attachment.
pub async fn export(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> AppResult<impl IntoResponse> {
    let format: ExportFormat = format.parse()?;
    let inbox = owner_inbox(&state, &auth).await?;

    let notes = NoteRepo::list_all_for_inbox(&state.pool, inbox.id).await?;
    let rows: Vec<_> = notes.iter().map(Note::as_export).collect();
    let body = build_csv(&rows);

    tracing::info!(slug = %inbox.slug, count = rows.len(), "Inbox exported");

    Ok((
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.filename()),
            ),
        ],
        body,
    ))
}

// ---------------------------------------------------------------------------
// Toggles
// ---------------------------------------------------------------------------

/// POST /api/v1/inbox/enable
pub async fn enable_inbox(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    set_inbox_enabled(auth, &state, true).await
}

/// POST /api/v1/inbox/disable
///
/// A disabled inbox stops accepting notes; existing notes stay visible to
/// the owner.
pub async fn disable_inbox(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    set_inbox_enabled(auth, &state, false).await
}

/// POST /api/v1/inbox/email/enable
pub async fn enable_email(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    set_email_enabled(auth, &state, true).await
}

/// POST /api/v1/inbox/email/disable
pub async fn disable_email(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    set_email_enabled(auth, &state, false).await
}

async fn set_inbox_enabled(
    auth: AuthUser,
    state: &AppState,
    enabled: bool,
) -> AppResult<Json<DataResponse<InboxView>>> {
    let inbox = InboxRepo::set_enabled(&state.pool, &auth.auth_id, enabled)
        .await?
        .ok_or_else(|| missing_inbox(&auth))?;

    tracing::info!(slug = %inbox.slug, enabled, "Inbox availability changed");
    Ok(Json(DataResponse {
        data: InboxView::new(state, &inbox),
    }))
}

async fn set_email_enabled(
    auth: AuthUser,
    state: &AppState,
    email_enabled: bool,
) -> AppResult<Json<DataResponse<InboxView>>> {
    let inbox = InboxRepo::set_email_enabled(&state.pool, &auth.auth_id, email_enabled)
        .await?
        .ok_or_else(|| missing_inbox(&auth))?;

    tracing::info!(slug = %inbox.slug, email_enabled, "Inbox e-mail notifications changed");
    Ok(Json(DataResponse {
        data: InboxView::new(state, &inbox),
    }))
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// PATCH /api/v1/inbox/notes/{uuid}/archive
///
/// Archive one of the owner's notes. Notes of other inboxes are reported
/// as missing.
pub async fn archive_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let note_uuid = parse_note_uuid(&uuid)?;
    let inbox = owner_inbox(&state, &auth).await?;

    let note = NoteRepo::archive(&state.pool, inbox.id, note_uuid)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Note", note_uuid)))?;

    tracing::info!(slug = %inbox.slug, note = %note.uuid, "Note archived");
    Ok(Json(DataResponse {
        data: NoteView::from(note),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn owner_inbox(state: &AppState, auth: &AuthUser) -> AppResult<Inbox> {
    InboxRepo::find_by_auth_id(&state.pool, &auth.auth_id)
        .await?
        .ok_or_else(|| missing_inbox(auth))
}

fn missing_inbox(auth: &AuthUser) -> AppError {
    AppError::Core(CoreError::not_found("Inbox", &auth.nickname))
}
