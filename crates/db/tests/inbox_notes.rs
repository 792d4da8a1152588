//! Integration tests for the inbox and note repositories.
//!
//! Exercises the repository layer against a real database:
//! - Inbox creation and slug disambiguation
//! - Enable / e-mail toggles
//! - Note submission, listing, archiving and ownership scoping
//! - Cascade delete behaviour

use saythanks_db::models::inbox::CreateInbox;
use saythanks_db::models::note::CreateNote;
use saythanks_db::repositories::{InboxRepo, NoteRepo};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_inbox(slug: &str, auth_id: &str) -> CreateInbox {
    CreateInbox {
        slug: slug.to_string(),
        auth_id: auth_id.to_string(),
        email: Some(format!("{slug}@example.com")),
    }
}

fn new_note(body: &str, byline: &str) -> CreateNote {
    CreateNote {
        body: body.to_string(),
        byline: byline.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Inboxes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_inbox_defaults(pool: PgPool) {
    let inbox = InboxRepo::create(&pool, &new_inbox("alice", "auth0|alice"))
        .await
        .unwrap();

    assert_eq!(inbox.slug, "alice");
    assert!(inbox.enabled, "new inboxes accept notes");
    assert!(inbox.email_enabled, "new inboxes notify by e-mail");
    assert!(InboxRepo::slug_exists(&pool, "alice").await.unwrap());
    assert!(!InboxRepo::slug_exists(&pool, "bob").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_violates_constraint(pool: PgPool) {
    InboxRepo::create(&pool, &new_inbox("alice", "auth0|one"))
        .await
        .unwrap();
    let err = InboxRepo::create(&pool, &new_inbox("alice", "auth0|two"))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_inboxes_slug"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_available_slug_disambiguates(pool: PgPool) {
    InboxRepo::create(&pool, &new_inbox("alice", "auth0|first"))
        .await
        .unwrap();
    InboxRepo::create(&pool, &new_inbox("alice-2", "auth0|second"))
        .await
        .unwrap();

    let inbox = InboxRepo::create_with_available_slug(&pool, "alice", "auth0|third", None)
        .await
        .unwrap()
        .expect("a free slug should be found");

    assert_eq!(inbox.slug, "alice-3");
    assert_eq!(inbox.auth_id, "auth0|third");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggles_are_scoped_to_owner(pool: PgPool) {
    InboxRepo::create(&pool, &new_inbox("alice", "auth0|alice"))
        .await
        .unwrap();
    InboxRepo::create(&pool, &new_inbox("bob", "auth0|bob"))
        .await
        .unwrap();

    let alice = InboxRepo::set_enabled(&pool, "auth0|alice", false)
        .await
        .unwrap()
        .unwrap();
    assert!(!alice.enabled);

    let alice = InboxRepo::set_email_enabled(&pool, "auth0|alice", false)
        .await
        .unwrap()
        .unwrap();
    assert!(!alice.email_enabled);

    let bob = InboxRepo::find_by_slug(&pool, "bob").await.unwrap().unwrap();
    assert!(bob.enabled);
    assert!(bob.email_enabled);

    let missing = InboxRepo::set_enabled(&pool, "auth0|nobody", true)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_email_keeps_existing_on_none(pool: PgPool) {
    InboxRepo::create(&pool, &new_inbox("alice", "auth0|alice"))
        .await
        .unwrap();

    let inbox = InboxRepo::update_email(&pool, "auth0|alice", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(inbox.email.as_deref(), Some("alice@example.com"));

    let inbox = InboxRepo::update_email(&pool, "auth0|alice", Some("new@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(inbox.email.as_deref(), Some("new@example.com"));
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_and_list_notes(pool: PgPool) {
    let inbox = InboxRepo::create(&pool, &new_inbox("alice", "auth0|alice"))
        .await
        .unwrap();

    let first = NoteRepo::create(&pool, inbox.id, &new_note("first", "A"))
        .await
        .unwrap();
    let second = NoteRepo::create(&pool, inbox.id, &new_note("second", "B"))
        .await
        .unwrap();

    assert_ne!(first.uuid, second.uuid);
    assert!(!first.archived);

    let active = NoteRepo::list_for_inbox(&pool, inbox.id, false).await.unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].uuid, second.uuid, "newest note comes first");

    let archived = NoteRepo::list_for_inbox(&pool, inbox.id, true).await.unwrap();
    assert!(archived.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_moves_note_between_lists(pool: PgPool) {
    let inbox = InboxRepo::create(&pool, &new_inbox("alice", "auth0|alice"))
        .await
        .unwrap();
    let note = NoteRepo::create(&pool, inbox.id, &new_note("thanks", ""))
        .await
        .unwrap();

    let archived = NoteRepo::archive(&pool, inbox.id, note.uuid)
        .await
        .unwrap()
        .expect("owner can archive");
    assert!(archived.archived);

    assert!(NoteRepo::list_for_inbox(&pool, inbox.id, false)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        NoteRepo::list_for_inbox(&pool, inbox.id, true).await.unwrap().len(),
        1
    );

    let all = NoteRepo::list_all_for_inbox(&pool, inbox.id).await.unwrap();
    assert_eq!(all.len(), 1, "export includes archived notes");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_is_scoped_to_inbox(pool: PgPool) {
    let alice = InboxRepo::create(&pool, &new_inbox("alice", "auth0|alice"))
        .await
        .unwrap();
    let bob = InboxRepo::create(&pool, &new_inbox("bob", "auth0|bob"))
        .await
        .unwrap();
    let note = NoteRepo::create(&pool, alice.id, &new_note("for alice", ""))
        .await
        .unwrap();

    let result = NoteRepo::archive(&pool, bob.id, note.uuid).await.unwrap();
    assert!(result.is_none(), "another inbox cannot archive the note");

    let unchanged = NoteRepo::find_by_uuid(&pool, note.uuid).await.unwrap().unwrap();
    assert!(!unchanged.archived);

    let missing = NoteRepo::archive(&pool, alice.id, Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_shared_includes_inbox_slug(pool: PgPool) {
    let inbox = InboxRepo::create(&pool, &new_inbox("alice", "auth0|alice"))
        .await
        .unwrap();
    let note = NoteRepo::create(&pool, inbox.id, &new_note("line one\nline two", "Bob"))
        .await
        .unwrap();

    let shared = NoteRepo::find_shared(&pool, note.uuid).await.unwrap().unwrap();
    assert_eq!(shared.inbox_slug, "alice");
    assert_eq!(shared.body, "line one\nline two");
    assert_eq!(shared.byline, "Bob");

    assert!(NoteRepo::find_shared(&pool, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_inbox_cascades_to_notes(pool: PgPool) {
    let inbox = InboxRepo::create(&pool, &new_inbox("alice", "auth0|alice"))
        .await
        .unwrap();
    let note = NoteRepo::create(&pool, inbox.id, &new_note("bye", ""))
        .await
        .unwrap();

    sqlx::query("DELETE FROM inboxes WHERE id = $1")
        .bind(inbox.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(NoteRepo::find_by_uuid(&pool, note.uuid).await.unwrap().is_none());
}
