//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and the DTOs used to insert it.

pub mod inbox;
pub mod note;
pub mod session;
