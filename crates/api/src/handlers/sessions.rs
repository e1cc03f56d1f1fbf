//! Handlers for the session-management endpoints: listing live sessions,
//! login history, and revocation.
//!
//! Everything here reads the durable `sessions` table; revocation also
//! deletes the cache entry so the token dies immediately, not just in
//! the history view.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use rideline_core::error::CoreError;
use rideline_core::types::Timestamp;
use rideline_db::models::session::SessionRecord;
use rideline_db::repositories::SessionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentSession;
use crate::state::AppState;

/// Default number of login-history entries.
const DEFAULT_HISTORY_LIMIT: i64 = 50;
/// Upper bound on requested login-history entries.
const MAX_HISTORY_LIMIT: i64 = 200;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One live session, as shown in the sessions-management view.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    /// The session token; doubles as the revocation id.
    pub id: String,
    pub device: String,
    pub location: String,
    pub ip: String,
    pub last_active: Timestamp,
    pub created_at: Timestamp,
    pub is_current: bool,
}

impl From<SessionRecord> for SessionInfo {
    fn from(record: SessionRecord) -> Self {
        Self {
            id: record.session_id,
            device: record.device_info.unwrap_or_else(|| "Unknown Device".into()),
            location: record.location.unwrap_or_else(|| "Unknown Location".into()),
            ip: record.ip_address.unwrap_or_else(|| "Unknown".into()),
            last_active: record.last_active,
            created_at: record.created_at,
            is_current: record.is_current,
        }
    }
}

/// Response for `GET /api/sessions`.
#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionInfo>,
}

/// One login-history entry; unlike [`SessionInfo`] this includes
/// expired and logged-out sessions.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub device: String,
    pub location: String,
    pub ip: String,
    pub last_active: Timestamp,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    /// When the session ended. An expired session with no explicit
    /// logout reports its expiry time here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_out_at: Option<Timestamp>,
    pub is_current: bool,
    pub is_expired: bool,
}

impl From<SessionRecord> for HistoryEntry {
    fn from(record: SessionRecord) -> Self {
        let is_expired = record.expires_at < Utc::now();
        let logged_out_at = record
            .logged_out_at
            .or(if is_expired { Some(record.expires_at) } else { None });
        Self {
            id: record.session_id,
            device: record.device_info.unwrap_or_else(|| "Unknown Device".into()),
            location: record.location.unwrap_or_else(|| "Location unavailable".into()),
            ip: record.ip_address.unwrap_or_else(|| "Unknown".into()),
            last_active: record.last_active,
            created_at: record.created_at,
            expires_at: record.expires_at,
            logged_out_at,
            is_current: record.is_current,
            is_expired,
        }
    }
}

/// Response for `GET /api/login-history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

/// Query parameters for `GET /api/login-history`.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// Response for `DELETE /api/sessions` (revoke all others).
#[derive(Debug, Serialize)]
pub struct RevokeAllResponse {
    pub message: &'static str,
    /// Number of sessions revoked.
    pub revoked: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/sessions
///
/// The caller's active sessions, most recently active first.
pub async fn list(
    State(state): State<AppState>,
    current: CurrentSession,
) -> AppResult<Json<SessionsResponse>> {
    let records =
        SessionRepo::list_active_for_user(&state.pool, current.session.user_id, &current.token)
            .await?;
    Ok(Json(SessionsResponse {
        sessions: records.into_iter().map(SessionInfo::from).collect(),
    }))
}

/// GET /api/login-history
///
/// All of the caller's sessions including expired and revoked ones.
/// `limit` defaults to 50, capped at 200.
pub async fn login_history(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<HistoryResponse>> {
    let limit = params
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    let records =
        SessionRepo::login_history(&state.pool, current.session.user_id, &current.token, limit)
            .await?;
    Ok(Json(HistoryResponse {
        history: records.into_iter().map(HistoryEntry::from).collect(),
    }))
}

/// DELETE /api/sessions/{id}
///
/// Revoke one of the caller's other sessions. The current session cannot
/// be revoked here (that is what logout is for), and tokens the caller
/// does not own read as absent.
pub async fn revoke(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(token): Path<String>,
) -> AppResult<Json<super::MessageResponse>> {
    if token == current.token {
        return Err(AppError::BadRequest("cannot revoke current session".into()));
    }

    SessionRepo::find_active_for_user(&state.pool, current.session.user_id, &token)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "session" }))?;

    if let Err(e) = SessionRepo::mark_logged_out(&state.pool, &token).await {
        tracing::warn!(error = %e, "revoke metadata update failed");
    }
    if let Err(e) = state.auth.logout(&token).await {
        tracing::warn!(error = %e, "revoke cache delete failed");
    }

    Ok(Json(super::MessageResponse {
        message: "session revoked",
    }))
}

/// DELETE /api/sessions
///
/// Revoke every session of the caller's except the current one.
pub async fn revoke_all(
    State(state): State<AppState>,
    current: CurrentSession,
) -> AppResult<Json<RevokeAllResponse>> {
    let records =
        SessionRepo::list_active_for_user(&state.pool, current.session.user_id, &current.token)
            .await?;

    let revoked = SessionRepo::mark_all_logged_out_except(
        &state.pool,
        current.session.user_id,
        &current.token,
    )
    .await?;

    for record in records {
        if record.session_id != current.token {
            if let Err(e) = state.auth.logout(&record.session_id).await {
                tracing::warn!(error = %e, "revoke-all cache delete failed");
            }
        }
    }

    Ok(Json(RevokeAllResponse {
        message: "all other sessions revoked",
        revoked,
    }))
}
