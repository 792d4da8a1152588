//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the logged-in user from the session
//!   cookie or a Bearer token.

pub mod auth;
