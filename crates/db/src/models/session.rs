//! Session provenance model and DTOs.

use sqlx::FromRow;

use rideline_core::types::{DbId, Timestamp};

/// A session row from the `sessions` table, with `is_current` computed
/// against the token the caller presented (never stored).
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub session_id: String,
    pub device_info: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub is_current: bool,
    pub last_active: Timestamp,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub logged_out_at: Option<Timestamp>,
}

/// DTO for recording session provenance at login.
#[derive(Debug)]
pub struct CreateSessionRecord {
    pub user_id: DbId,
    pub session_id: String,
    pub device_info: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub expires_at: Timestamp,
}
