//! Route definitions for session management.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /      -> list active sessions
/// DELETE /      -> revoke all but current
/// DELETE /{id}  -> revoke one (404 unless owned; 400 for the current one)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list).delete(sessions::revoke_all))
        .route("/{id}", delete(sessions::revoke))
}
