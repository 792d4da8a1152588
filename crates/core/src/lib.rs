//! Domain types and pure logic for SayThanks.
//!
//! Nothing in this crate touches the database or the network; the `db`,
//! `notify` and `api` crates build on it.

pub mod error;
pub mod export;
pub mod links;
pub mod names;
pub mod sanitize;
pub mod slug;
pub mod types;
