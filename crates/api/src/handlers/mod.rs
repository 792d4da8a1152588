//! HTTP handlers, grouped by resource.
//!
//! - [`auth`] -- OAuth login, callback, logout and session profile.
//! - [`inbox`] -- the owner's dashboard, export and toggles.
//! - [`public`] -- anonymous note submission and share pages.

pub mod auth;
pub mod inbox;
pub mod public;

use saythanks_core::error::CoreError;
use uuid::Uuid;

use crate::error::AppError;

/// Parse a note id from a path segment. Malformed ids are reported as a
/// missing note rather than a bad request.
pub(crate) fn parse_note_uuid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Core(CoreError::not_found("Note", raw)))
}
