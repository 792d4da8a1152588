//! Front-end URLs handed out by the API and in e-mails.
//!
//! | Page                   | Path            |
//! |------------------------|-----------------|
//! | Owner dashboard        | `/inbox`        |
//! | Public submission form | `/to/{slug}`    |
//! | Shared note            | `/note/{uuid}`  |
//!
//! `base_url` is the public site root without a trailing slash.

use uuid::Uuid;

/// URL of the owner's dashboard; the login callback lands here.
pub fn dashboard_url(base_url: &str) -> String {
    format!("{base_url}/inbox")
}

/// URL at which an inbox accepts notes.
pub fn inbox_share_url(base_url: &str, slug: &str) -> String {
    format!("{base_url}/to/{slug}")
}

/// URL of a note's public share page.
pub fn note_share_url(base_url: &str, uuid: Uuid) -> String {
    format!("{base_url}/note/{uuid}")
}
