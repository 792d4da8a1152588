//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod inbox_repo;
pub mod note_repo;
pub mod session_repo;

pub use inbox_repo::InboxRepo;
pub use note_repo::NoteRepo;
pub use session_repo::SessionRepo;
