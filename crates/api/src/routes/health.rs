use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Configured application name.
    pub service: String,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the cache backend is reachable.
    pub cache_healthy: bool,
}

/// GET /health -- service, database, and cache health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = rideline_db::health_check(&state.pool).await.is_ok();
    let cache_healthy = state.sessions.ping().await.is_ok();

    let status = if db_healthy && cache_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        service: state.config.app_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        cache_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
