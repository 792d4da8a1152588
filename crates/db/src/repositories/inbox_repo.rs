//! Repository for the `inboxes` table.

use saythanks_core::slug::{candidate_slug, MAX_SLUG_ATTEMPTS};
use sqlx::PgPool;

use crate::models::inbox::{CreateInbox, Inbox};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, auth_id, email, enabled, email_enabled, created_at, updated_at";

/// Provides CRUD operations for inboxes.
pub struct InboxRepo;

impl InboxRepo {
    /// Insert a new inbox, returning the created row.
    ///
    /// Fails with a `uq_inboxes_slug` / `uq_inboxes_auth_id` violation if the
    /// slug is taken or the owner already has an inbox.
    pub async fn create(pool: &PgPool, input: &CreateInbox) -> Result<Inbox, sqlx::Error> {
        let query = format!(
            "INSERT INTO inboxes (slug, auth_id, email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inbox>(&query)
            .bind(&input.slug)
            .bind(&input.auth_id)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Create an inbox for `auth_id`, falling back to `base-2`, `base-3`, ...
    /// while the slug is taken.
    ///
    /// Returns `None` if no free slug was found within
    /// [`MAX_SLUG_ATTEMPTS`] attempts.
    pub async fn create_with_available_slug(
        pool: &PgPool,
        base_slug: &str,
        auth_id: &str,
        email: Option<&str>,
    ) -> Result<Option<Inbox>, sqlx::Error> {
        let query = format!(
            "INSERT INTO inboxes (slug, auth_id, email)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_inboxes_slug DO NOTHING
             RETURNING {COLUMNS}"
        );

        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let slug = candidate_slug(base_slug, attempt);
            let created = sqlx::query_as::<_, Inbox>(&query)
                .bind(&slug)
                .bind(auth_id)
                .bind(email)
                .fetch_optional(pool)
                .await?;

            if let Some(inbox) = created {
                return Ok(Some(inbox));
            }
            tracing::debug!(slug = %slug, "Inbox slug taken, trying next candidate");
        }

        Ok(None)
    }

    /// Find an inbox by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Inbox>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inboxes WHERE slug = $1");
        sqlx::query_as::<_, Inbox>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find the inbox owned by the given identity-provider subject.
    pub async fn find_by_auth_id(
        pool: &PgPool,
        auth_id: &str,
    ) -> Result<Option<Inbox>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inboxes WHERE auth_id = $1");
        sqlx::query_as::<_, Inbox>(&query)
            .bind(auth_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an inbox with this slug exists.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM inboxes WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await?;
        Ok(exists.0)
    }

    /// Enable or disable the owner's inbox for new submissions.
    pub async fn set_enabled(
        pool: &PgPool,
        auth_id: &str,
        enabled: bool,
    ) -> Result<Option<Inbox>, sqlx::Error> {
        let query = format!(
            "UPDATE inboxes SET enabled = $2
             WHERE auth_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inbox>(&query)
            .bind(auth_id)
            .bind(enabled)
            .fetch_optional(pool)
            .await
    }

    /// Enable or disable e-mail notifications for the owner's inbox.
    pub async fn set_email_enabled(
        pool: &PgPool,
        auth_id: &str,
        email_enabled: bool,
    ) -> Result<Option<Inbox>, sqlx::Error> {
        let query = format!(
            "UPDATE inboxes SET email_enabled = $2
             WHERE auth_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inbox>(&query)
            .bind(auth_id)
            .bind(email_enabled)
            .fetch_optional(pool)
            .await
    }

    /// Replace the notification address recorded for the owner.
    ///
    /// A `None` email leaves the stored address untouched.
    pub async fn update_email(
        pool: &PgPool,
        auth_id: &str,
        email: Option<&str>,
    ) -> Result<Option<Inbox>, sqlx::Error> {
        let query = format!(
            "UPDATE inboxes SET email = COALESCE($2, email)
             WHERE auth_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inbox>(&query)
            .bind(auth_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
