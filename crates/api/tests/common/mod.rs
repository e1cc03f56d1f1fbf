//! Shared harness for HTTP-level integration tests.
//!
//! Builds the production router stack over a per-test database (via
//! `#[sqlx::test]`) and the in-process cache backend, then drives it
//! with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use rideline_api::auth::password::hash_password;
use rideline_api::auth::service::AuthService;
use rideline_api::background::session_touch;
use rideline_api::config::{CookieConfig, SameSite, ServerConfig};
use rideline_api::location::GeoLocator;
use rideline_api::router::build_app_router;
use rideline_api::state::AppState;
use rideline_cache::otp::OtpStore;
use rideline_cache::session::SessionStore;
use rideline_cache::Cache;
use rideline_db::models::user::{CreateUser, User};
use rideline_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults: in-process cache,
/// no SMTP, no CORS origins, Lax non-secure cookie.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        app_name: "rideline-test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
        redis_url: None,
        session_ttl: Duration::from_secs(24 * 3600),
        otp_ttl: Duration::from_secs(300),
        cache_op_timeout: Duration::from_secs(5),
        cookie: CookieConfig {
            same_site: SameSite::Lax,
            secure: false,
        },
        email: None,
    }
}

/// Build the full application router plus the state behind it.
///
/// The state is returned so tests can reach the cache stores directly
/// (e.g. to learn the one-time code that would have been emailed).
pub fn build_test_app(pool: PgPool) -> (Router, AppState) {
    let config = test_config();

    let cache = Arc::new(Cache::in_memory(config.cache_op_timeout));
    let sessions = SessionStore::new(Arc::clone(&cache), config.session_ttl);
    let otps = OtpStore::new(cache, config.otp_ttl);

    let (touch, _handle) = session_touch::spawn(pool.clone(), CancellationToken::new());

    let auth = AuthService::new(pool.clone(), sessions.clone());
    let state = AppState {
        pool,
        auth,
        sessions,
        otps,
        config: Arc::new(config.clone()),
        mailer: None,
        touch,
        geo: GeoLocator::new(),
    };

    (build_app_router(state.clone(), &config), state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(COOKIE, format!("session_id={token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, path: &str) -> Response {
    send(app, Method::GET, path, None, None).await
}

pub async fn get_with_token(app: &Router, path: &str, token: &str) -> Response {
    send(app, Method::GET, path, None, Some(token)).await
}

/// GET with the token in an `Authorization: Bearer` header instead of
/// the cookie, for the non-browser transport.
pub async fn get_with_bearer(app: &Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, path, Some(body), None).await
}

pub async fn post_json_with_token(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, path, Some(body), Some(token)).await
}

pub async fn put_json_with_token(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, path, Some(body), Some(token)).await
}

pub async fn delete_with_token(app: &Router, path: &str, token: &str) -> Response {
    send(app, Method::DELETE, path, None, Some(token)).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Pull the session token out of a response's `Set-Cookie` header.
pub fn session_cookie_token(response: &Response) -> Option<String> {
    let raw = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let value = raw.split(';').next()?.strip_prefix("session_id=")?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Password used by every fixture user.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Create a user directly in the database.
pub async fn create_test_user(pool: &PgPool, username: &str, role: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@campus.test"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
        phone: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API, returning the session token and response body.
pub async fn login(app: &Router, identifier: &str, password: &str) -> (String, serde_json::Value) {
    let body = serde_json::json!({ "identifier": identifier, "password": password });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let token = session_cookie_token(&response).expect("login must set the session cookie");
    let json = body_json(response).await;
    assert_eq!(json["access_token"], token, "cookie and body token must match");
    (token, json)
}
