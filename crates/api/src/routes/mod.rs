pub mod auth;
pub mod health;
pub mod preferences;
pub mod sessions;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/login          login (public)
/// /auth/logout         logout (public; acts on the presented cookie)
/// /auth/send-otp       issue one-time code (public)
/// /auth/verify-otp     verify one-time code (public)
///
/// /me                  session + profile (session required)
///
/// /sessions            list active, revoke all others
/// /sessions/{id}       revoke one
/// /login-history       all sessions incl. expired (?limit)
///
/// /preferences         get, update (session required)
///
/// /users               list, create (Admin/SuperAdmin)
/// /users/{id}          get, update, delete (Admin/SuperAdmin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .route("/me", get(handlers::auth::me))
        .nest("/sessions", sessions::router())
        .route("/login-history", get(handlers::sessions::login_history))
        .nest("/preferences", preferences::router())
        .nest("/users", users::router())
}
