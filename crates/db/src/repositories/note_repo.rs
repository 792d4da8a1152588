//! Repository for the `notes` table.

use saythanks_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::note::{CreateNote, Note, SharedNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, uuid, inbox_id, body, byline, archived, created_at, updated_at";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Store a new note in the given inbox under a fresh random UUID.
    pub async fn create(
        pool: &PgPool,
        inbox_id: DbId,
        input: &CreateNote,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (uuid, inbox_id, body, byline)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(Uuid::new_v4())
            .bind(inbox_id)
            .bind(&input.body)
            .bind(&input.byline)
            .fetch_one(pool)
            .await
    }

    /// Find a note by its public UUID.
    pub async fn find_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE uuid = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Find a note together with its inbox slug, for the public share page.
    pub async fn find_shared(
        pool: &PgPool,
        uuid: Uuid,
    ) -> Result<Option<SharedNote>, sqlx::Error> {
        sqlx::query_as::<_, SharedNote>(
            "SELECT n.uuid, i.slug AS inbox_slug, n.body, n.byline, n.created_at
             FROM notes n
             JOIN inboxes i ON i.id = n.inbox_id
             WHERE n.uuid = $1",
        )
        .bind(uuid)
        .fetch_optional(pool)
        .await
    }

    /// List an inbox's active or archived notes, newest first.
    pub async fn list_for_inbox(
        pool: &PgPool,
        inbox_id: DbId,
        archived: bool,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE inbox_id = $1 AND archived = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(inbox_id)
            .bind(archived)
            .fetch_all(pool)
            .await
    }

    /// List every note in an inbox regardless of state, oldest first.
    pub async fn list_all_for_inbox(
        pool: &PgPool,
        inbox_id: DbId,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE inbox_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(inbox_id)
            .fetch_all(pool)
            .await
    }

    /// Archive a note, provided it belongs to the given inbox.
    ///
    /// Returns `None` when no such note exists in that inbox. Archiving an
    /// already archived note returns it unchanged.
    pub async fn archive(
        pool: &PgPool,
        inbox_id: DbId,
        uuid: Uuid,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET archived = TRUE
             WHERE uuid = $1 AND inbox_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(uuid)
            .bind(inbox_id)
            .fetch_optional(pool)
            .await
    }
}
