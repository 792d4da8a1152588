//! Note model.

use saythanks_core::export::ExportNote;
use saythanks_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `notes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub uuid: Uuid,
    #[serde(skip_serializing)]
    pub inbox_id: DbId,
    /// Cleaned plain text; lines separated by `\n`.
    pub body: String,
    pub byline: String,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Note {
    pub fn as_export(&self) -> ExportNote<'_> {
        ExportNote {
            id: self.uuid,
            body: &self.body,
            byline: &self.byline,
            archived: self.archived,
            created_at: self.created_at,
        }
    }
}

/// DTO for creating a new note. Callers pass already-cleaned text.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub body: String,
    pub byline: String,
}

/// A note joined with the slug of the inbox it belongs to.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SharedNote {
    pub uuid: Uuid,
    pub inbox_slug: String,
    pub body: String,
    pub byline: String,
    pub created_at: Timestamp,
}
