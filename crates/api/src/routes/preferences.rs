//! Route definitions for user preferences.

use axum::routing::get;
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

/// Routes mounted at `/preferences`.
///
/// ```text
/// GET /  -> get (stored or defaults)
/// PUT /  -> update (store-native upsert)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(preferences::get).put(preferences::update))
}
