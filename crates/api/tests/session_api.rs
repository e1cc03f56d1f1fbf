//! HTTP-level integration tests for session management: listing,
//! revocation, and login history.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, delete_with_token, get_with_token, login, TEST_PASSWORD,
};
use sqlx::PgPool;

/// Listing sessions marks the presented token as current.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_sessions_flags_current(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (first, _) = login(&app, "alice", TEST_PASSWORD).await;
    let (second, _) = login(&app, "alice", TEST_PASSWORD).await;

    let response = get_with_token(&app, "/api/sessions", &second).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let sessions = json["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);

    for s in sessions {
        let expected_current = s["id"] == second.as_str();
        assert_eq!(s["is_current"], expected_current);
        assert!(s["id"] == first.as_str() || s["id"] == second.as_str());
    }
}

/// Revoking the caller's own current token is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_cannot_revoke_current_session(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (token, _) = login(&app, "alice", TEST_PASSWORD).await;
    let response = delete_with_token(&app, &format!("/api/sessions/{token}"), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "cannot revoke current session");
}

/// Revoking another of the caller's sessions kills that token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_revoke_other_session(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (old, _) = login(&app, "alice", TEST_PASSWORD).await;
    let (current, _) = login(&app, "alice", TEST_PASSWORD).await;

    let response = delete_with_token(&app, &format!("/api/sessions/{old}"), &current).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The revoked token stops resolving; the current one still works.
    assert_eq!(
        get_with_token(&app, "/api/me", &old).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        get_with_token(&app, "/api/me", &current).await.status(),
        StatusCode::OK
    );
}

/// A token the caller does not own reads as absent, including another
/// user's perfectly valid session.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_revoke_unowned_session_is_not_found(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    create_test_user(&pool, "mallory", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (alice_token, _) = login(&app, "alice", TEST_PASSWORD).await;
    let (mallory_token, _) = login(&app, "mallory", TEST_PASSWORD).await;

    let unknown =
        delete_with_token(&app, "/api/sessions/no-such-token", &mallory_token).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let foreign =
        delete_with_token(&app, &format!("/api/sessions/{alice_token}"), &mallory_token).await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    // Alice's session is untouched.
    assert_eq!(
        get_with_token(&app, "/api/me", &alice_token).await.status(),
        StatusCode::OK
    );
}

/// Revoke-all kills every session except the presented one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_revoke_all_keeps_current(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (first, _) = login(&app, "alice", TEST_PASSWORD).await;
    let (second, _) = login(&app, "alice", TEST_PASSWORD).await;
    let (current, _) = login(&app, "alice", TEST_PASSWORD).await;

    let response = delete_with_token(&app, "/api/sessions", &current).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["revoked"], 2);

    assert_eq!(
        get_with_token(&app, "/api/me", &first).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        get_with_token(&app, "/api/me", &second).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        get_with_token(&app, "/api/me", &current).await.status(),
        StatusCode::OK
    );
}

/// Login history keeps revoked sessions, unlike the active list.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_history_includes_revoked(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (old, _) = login(&app, "alice", TEST_PASSWORD).await;
    let (current, _) = login(&app, "alice", TEST_PASSWORD).await;

    let revoke = delete_with_token(&app, &format!("/api/sessions/{old}"), &current).await;
    assert_eq!(revoke.status(), StatusCode::OK);

    let active = body_json(get_with_token(&app, "/api/sessions", &current).await).await;
    assert_eq!(active["sessions"].as_array().unwrap().len(), 1);

    let history = body_json(get_with_token(&app, "/api/login-history", &current).await).await;
    let entries = history["history"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let revoked_entry = entries.iter().find(|e| e["id"] == old.as_str()).unwrap();
    assert!(revoked_entry["logged_out_at"].is_string());
    assert_eq!(revoked_entry["is_current"], false);
}

/// The history `limit` query parameter caps the result.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_history_respects_limit(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (mut token, _) = login(&app, "alice", TEST_PASSWORD).await;
    for _ in 0..3 {
        let (t, _) = login(&app, "alice", TEST_PASSWORD).await;
        token = t;
    }

    let response = get_with_token(&app, "/api/login-history?limit=2", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["history"].as_array().unwrap().len(), 2);
}

/// Session endpoints require authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_endpoints_require_auth(pool: PgPool) {
    let (app, _state) = common::build_test_app(pool);

    assert_eq!(
        common::get(&app, "/api/sessions").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        common::get(&app, "/api/login-history").await.status(),
        StatusCode::UNAUTHORIZED
    );
}
