//! User preference model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use rideline_core::types::{DbId, Timestamp};

/// A row from the `user_preferences` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserPreferences {
    pub id: DbId,
    pub user_id: DbId,
    pub accent_color: String,
    pub theme: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting preferences. `None` keeps the stored (or default) value.
#[derive(Debug, Default)]
pub struct UpsertPreferences {
    pub accent_color: Option<String>,
    pub theme: Option<String>,
}
