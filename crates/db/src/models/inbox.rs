//! Inbox model.

use saythanks_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `inboxes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Inbox {
    pub id: DbId,
    pub slug: String,
    /// Identity-provider subject (`sub`) of the owner.
    #[serde(skip_serializing)]
    pub auth_id: String,
    #[serde(skip_serializing)]
    pub email: Option<String>,
    pub enabled: bool,
    pub email_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new inbox.
#[derive(Debug, Clone)]
pub struct CreateInbox {
    pub slug: String,
    pub auth_id: String,
    pub email: Option<String>,
}
