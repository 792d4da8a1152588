//! Authentication primitives.
//!
//! - [`identity`] -- the identity-provider seam and the profile it yields.
//! - [`auth0`] -- Auth0 authorization-code flow client.
//! - [`session`] -- signed session tokens and their server-side hashes.
//! - [`cookie`] -- reading and writing the session and OAuth state cookies.

pub mod auth0;
pub mod cookie;
pub mod identity;
pub mod session;
