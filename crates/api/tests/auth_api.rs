//! HTTP-level integration tests for login, logout, and `/api/me`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, get_with_bearer, get_with_token, login, post_json,
    session_cookie_token, TEST_PASSWORD,
};
use sqlx::PgPool;

/// Successful login returns the session payload, the token, and sets the
/// session cookie.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/auth/login",
        serde_json::json!({ "identifier": "alice", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("session_id="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=Lax"));

    let json = body_json(response).await;
    assert_eq!(json["session"]["user_id"], user.id);
    assert_eq!(json["session"]["username"], "alice");
    assert_eq!(json["session"]["email"], "alice@campus.test");
    assert_eq!(json["session"]["role"], "user");
    assert!(json["access_token"].is_string());
}

/// The identifier matches the email as well as the username.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_by_email(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (_token, json) = login(&app, "alice@campus.test", TEST_PASSWORD).await;
    assert_eq!(json["session"]["username"], "alice");
}

/// A wrong password and an unknown identifier fail identically: 401 with
/// the same error body.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_failures_are_indistinguishable(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let wrong_password = post_json(
        &app,
        "/api/auth/login",
        serde_json::json!({ "identifier": "alice", "password": "incorrect" }),
    )
    .await;
    let unknown_user = post_json(
        &app,
        "/api/auth/login",
        serde_json::json!({ "identifier": "ghost", "password": "whatever" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_body = body_json(wrong_password).await;
    let unknown_body = body_json(unknown_user).await;
    assert_eq!(wrong_body, serde_json::json!({ "error": "invalid credentials" }));
    assert_eq!(wrong_body, unknown_body);
}

/// Missing fields are a 400, not a 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_missing_fields(pool: PgPool) {
    let (app, _state) = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/auth/login",
        serde_json::json!({ "identifier": "", "password": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "identifier and password are required");
}

/// The login cookie authenticates `/api/me`, which returns the session
/// and the full profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_with_cookie(pool: PgPool) {
    let user = create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (token, _json) = login(&app, "alice", TEST_PASSWORD).await;
    let response = get_with_token(&app, "/api/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["session"]["user_id"], user.id);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "alice");
    assert!(
        json["user"].get("password_hash").is_none(),
        "profile must never expose the password hash"
    );
}

/// Non-browser clients can present the token as a bearer header.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_with_bearer_token(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (token, _json) = login(&app, "alice", TEST_PASSWORD).await;
    let response = get_with_bearer(&app, "/api/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
}

/// No token and a garbage token both yield 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_unauthorized(pool: PgPool) {
    let (app, _state) = common::build_test_app(pool);

    let missing = common::get(&app, "/api/me").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = get_with_token(&app, "/api/me", "not-a-session").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

/// Logout invalidates the token, clears the cookie, and is idempotent.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_is_idempotent(pool: PgPool) {
    create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool);

    let (token, _json) = login(&app, "alice", TEST_PASSWORD).await;

    let response =
        common::post_json_with_token(&app, "/api/auth/logout", serde_json::json!({}), &token)
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        session_cookie_token(&response),
        None,
        "logout must clear the cookie"
    );

    // The token no longer resolves.
    let me = get_with_token(&app, "/api/me", &token).await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);

    // Logging out again with the same (now dead) token still succeeds.
    let again =
        common::post_json_with_token(&app, "/api/auth/logout", serde_json::json!({}), &token)
            .await;
    assert_eq!(again.status(), StatusCode::OK);
}

/// Login records a session metadata row with provenance fields.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_records_session_metadata(pool: PgPool) {
    let user = create_test_user(&pool, "alice", "user").await;
    let (app, _state) = common::build_test_app(pool.clone());

    let (token, _json) = login(&app, "alice", TEST_PASSWORD).await;

    let row: (i64, String) =
        sqlx::query_as("SELECT user_id, session_id FROM sessions WHERE session_id = $1")
            .bind(&token)
            .fetch_one(&pool)
            .await
            .expect("login must insert a session row");
    assert_eq!(row.0, user.id);
    assert_eq!(row.1, token);
}
