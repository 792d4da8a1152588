//! Outbound notifications for inbox owners.
//!
//! - [`email`] -- SMTP delivery of "you've received a note" mails.

pub mod email;

pub use email::{EmailConfig, EmailDelivery, EmailError, NoteEmail};
