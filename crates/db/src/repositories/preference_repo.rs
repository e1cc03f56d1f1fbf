//! Repository for the `user_preferences` table.

use sqlx::PgPool;

use rideline_core::types::DbId;

use crate::models::preference::{UpsertPreferences, UserPreferences};

/// Column list for `user_preferences` queries.
const COLUMNS: &str = "id, user_id, accent_color, theme, created_at, updated_at";

/// Provides data access for per-user preferences.
pub struct PreferenceRepo;

impl PreferenceRepo {
    /// Get a user's preferences.
    ///
    /// Returns `None` if the user has never saved any.
    pub async fn get(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserPreferences>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreferences>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or update a user's preferences.
    ///
    /// Uses `ON CONFLICT (user_id) DO UPDATE` so only provided fields are
    /// changed (falls back to existing values via `COALESCE`). Concurrent
    /// writers resolve last-write-wins through the store's native conflict
    /// handling.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertPreferences,
    ) -> Result<UserPreferences, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_preferences (user_id, accent_color, theme)
             VALUES ($1, COALESCE($2, 'blue'), COALESCE($3, 'system'))
             ON CONFLICT (user_id) DO UPDATE SET
                 accent_color = COALESCE($2, user_preferences.accent_color),
                 theme = COALESCE($3, user_preferences.theme),
                 updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreferences>(&query)
            .bind(user_id)
            .bind(&input.accent_color)
            .bind(&input.theme)
            .fetch_one(pool)
            .await
    }
}
