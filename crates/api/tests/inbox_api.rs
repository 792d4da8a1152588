//! HTTP-level integration tests for the owner's inbox dashboard.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{
    body_json, body_text, get, get_with_cookie, login_as, patch_with_cookie, post_json,
    post_with_cookie, submit,
};
use saythanks_db::repositories::InboxRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn dashboard(app: &axum::Router, cookie: &str, uri: &str) -> serde_json::Value {
    let response = get_with_cookie(app.clone(), uri, cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

fn note_uuids(json: &serde_json::Value) -> Vec<String> {
    json["data"]["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["uuid"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// A fresh inbox has no notes and reports its share URL and flags.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_for_new_inbox(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = login_as(&app, "alice").await;

    let json = dashboard(&app, &cookie, "/api/v1/inbox").await;
    let data = &json["data"];

    assert_eq!(data["user"]["nickname"], "alice");
    assert_eq!(data["inbox"]["slug"], "alice");
    assert_eq!(data["inbox"]["share_url"], "http://localhost:5173/to/alice");
    assert_eq!(data["is_enabled"], true);
    assert_eq!(data["is_email_enabled"], true);
    assert_eq!(data["notes"].as_array().unwrap().len(), 0);
}

/// Submitted notes show up newest first, with cleaned text and rendered HTML.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_lists_notes_newest_first(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = login_as(&app, "alice").await;

    submit(&app, "alice", "first", "").await;
    submit(&app, "alice", "<b>second</b>\nline & two", "A <i>fan</i>").await;

    let json = dashboard(&app, &cookie, "/api/v1/inbox").await;
    let notes = json["data"]["notes"].as_array().unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["body"], "second\nline & two");
    assert_eq!(notes[0]["body_html"], "second<br>line &amp; two");
    assert_eq!(notes[0]["byline"], "A fan");
    assert_eq!(notes[0]["archived"], false);
    assert_eq!(notes[1]["body"], "first");
    assert!(notes[0].get("inbox_id").is_none());
}

/// Owner routes require a session.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_routes_require_session(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in [
        "/api/v1/inbox",
        "/api/v1/inbox/archived",
        "/api/v1/inbox/export/csv",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
    let response = post_json(app, "/api/v1/inbox/disable", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// Archiving moves a note from the active to the archived dashboard.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_moves_note(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = login_as(&app, "alice").await;
    submit(&app, "alice", "keep me", "").await;
    submit(&app, "alice", "archive me", "").await;

    let active = dashboard(&app, &cookie, "/api/v1/inbox").await;
    let target = note_uuids(&active)[0].clone();

    let response = patch_with_cookie(
        app.clone(),
        &format!("/api/v1/inbox/notes/{target}/archive"),
        &cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["archived"], true);

    let active = dashboard(&app, &cookie, "/api/v1/inbox").await;
    assert!(!note_uuids(&active).contains(&target));

    let archived = dashboard(&app, &cookie, "/api/v1/inbox/archived").await;
    assert_eq!(note_uuids(&archived), vec![target]);
}

/// Archiving someone else's note is reported as not found.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_other_inbox_note_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = login_as(&app, "alice").await;
    let bob = login_as(&app, "bob").await;
    submit(&app, "alice", "for alice", "").await;

    let notes = dashboard(&app, &alice, "/api/v1/inbox").await;
    let target = note_uuids(&notes)[0].clone();

    let response = patch_with_cookie(
        app.clone(),
        &format!("/api/v1/inbox/notes/{target}/archive"),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let notes = dashboard(&app, &alice, "/api/v1/inbox").await;
    assert_eq!(notes["data"]["notes"][0]["archived"], false);
}

/// Unknown and malformed note ids return 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_unknown_note_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = login_as(&app, "alice").await;

    for id in ["00000000-0000-0000-0000-000000000000", "not-a-uuid"] {
        let response = patch_with_cookie(
            app.clone(),
            &format!("/api/v1/inbox/notes/{id}/archive"),
            &cookie,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{id}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// CSV export contains every note, oldest first, as an attachment.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_export_csv(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = login_as(&app, "alice").await;
    submit(&app, "alice", "plain", "Bob").await;
    submit(&app, "alice", "with, comma\nand newline", "").await;

    // Archived notes are exported too.
    let notes = dashboard(&app, &cookie, "/api/v1/inbox").await;
    let newest = note_uuids(&notes)[0].clone();
    patch_with_cookie(
        app.clone(),
        &format!("/api/v1/inbox/notes/{newest}/archive"),
        &cookie,
    )
    .await;

    let response = get_with_cookie(app, "/api/v1/inbox/export/csv", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE].to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION].to_str().unwrap(),
        "attachment; filename=\"saythanks-inbox.csv\""
    );

    let csv = body_text(response).await;
    assert!(csv.starts_with("id,body,byline,archived,created_at\n"));

    let plain = csv.find(",plain,Bob,false,").expect("plain note row");
    let quoted = csv
        .find(&format!("{newest},\"with, comma\nand newline\",,true,"))
        .expect("archived note row");
    assert!(plain < quoted, "notes must be exported oldest first");
}

/// Unsupported export formats are rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_export_unsupported_format(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = login_as(&app, "alice").await;

    let response = get_with_cookie(app, "/api/v1/inbox/export/xlsx", &cookie).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Toggles
// ---------------------------------------------------------------------------

/// Disabling an inbox hides its form and rejects submissions until re-enabled.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_disable_and_enable_inbox(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let cookie = login_as(&app, "alice").await;

    let response = post_with_cookie(app.clone(), "/api/v1/inbox/disable", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["enabled"], false);

    let response = get(app.clone(), "/api/v1/to/alice").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        app.clone(),
        "/api/v1/to/alice/submit",
        serde_json::json!({ "body": "hello?" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner still sees the dashboard while disabled.
    let json = dashboard(&app, &cookie, "/api/v1/inbox").await;
    assert_eq!(json["data"]["is_enabled"], false);

    let response = post_with_cookie(app.clone(), "/api/v1/inbox/enable", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    submit(&app, "alice", "hello again", "").await;
    let inbox = InboxRepo::find_by_slug(&pool, "alice").await.unwrap().unwrap();
    assert!(inbox.enabled);
}

/// E-mail notifications can be switched off and on.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_disable_and_enable_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = login_as(&app, "alice").await;

    let response = post_with_cookie(app.clone(), "/api/v1/inbox/email/disable", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = dashboard(&app, &cookie, "/api/v1/inbox").await;
    assert_eq!(json["data"]["is_email_enabled"], false);
    assert_eq!(json["data"]["inbox"]["email_enabled"], false);

    let response = post_with_cookie(app.clone(), "/api/v1/inbox/email/enable", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = dashboard(&app, &cookie, "/api/v1/inbox").await;
    assert_eq!(json["data"]["is_email_enabled"], true);
}

/// Toggles are not reachable with GET.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggles_reject_get(pool: PgPool) {
    let app = common::build_test_app(pool);
    let cookie = login_as(&app, "alice").await;

    let response = get_with_cookie(app, "/api/v1/inbox/disable", &cookie).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
