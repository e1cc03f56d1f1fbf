//! Repository for the `sessions` table.
//!
//! These rows are provenance only -- the cache decides whether a token is
//! live. Revocation therefore sets `logged_out_at` instead of deleting, so
//! login history survives.

use sqlx::PgPool;

use rideline_core::types::DbId;

use crate::models::session::{CreateSessionRecord, SessionRecord};

/// Column list shared across queries. `is_current` is computed per query
/// against the token the caller presented.
const COLUMNS: &str = "id, user_id, session_id, device_info, user_agent, ip_address, \
                        location, (session_id = $2) AS is_current, last_active, \
                        expires_at, created_at, logged_out_at";

/// Provides data access for session provenance.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert session provenance at login, or refresh it when the token
    /// already has a row. The conflict path relies on the store's native
    /// single-row upsert -- no application-level locking.
    pub async fn upsert(pool: &PgPool, input: &CreateSessionRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sessions (user_id, session_id, device_info, user_agent, ip_address, location, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (session_id) DO UPDATE SET
                 last_active = now(),
                 device_info = EXCLUDED.device_info,
                 user_agent = EXCLUDED.user_agent,
                 ip_address = EXCLUDED.ip_address,
                 location = EXCLUDED.location",
        )
        .bind(input.user_id)
        .bind(&input.session_id)
        .bind(&input.device_info)
        .bind(&input.user_agent)
        .bind(&input.ip_address)
        .bind(&input.location)
        .bind(input.expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List a user's active sessions, most recently active first.
    ///
    /// Active means not logged out and not expired. `current_token` is only
    /// used to compute the `is_current` flag.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
        current_token: &str,
    ) -> Result<Vec<SessionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE user_id = $1 AND expires_at > now() AND logged_out_at IS NULL
             ORDER BY last_active DESC"
        );
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(user_id)
            .bind(current_token)
            .fetch_all(pool)
            .await
    }

    /// List all of a user's sessions, including expired and logged-out
    /// ones, most recent first. Used for login history.
    pub async fn login_history(
        pool: &PgPool,
        user_id: DbId,
        current_token: &str,
        limit: i64,
    ) -> Result<Vec<SessionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(user_id)
            .bind(current_token)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Find one of a user's *active* sessions by token. Used to verify
    /// ownership before revocation; logged-out and expired sessions are
    /// not revocable and read as absent.
    pub async fn find_active_for_user(
        pool: &PgPool,
        user_id: DbId,
        token: &str,
    ) -> Result<Option<SessionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE user_id = $1 AND session_id = $2
               AND expires_at > now() AND logged_out_at IS NULL"
        );
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(user_id)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Set the logout marker on a session. Conditional on the marker not
    /// already being set, so repeated logouts keep the first timestamp.
    pub async fn mark_logged_out(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET logged_out_at = now()
             WHERE session_id = $1 AND logged_out_at IS NULL",
        )
        .bind(token)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the logout marker on all of a user's sessions except the given
    /// token. Returns the number of sessions revoked.
    pub async fn mark_all_logged_out_except(
        pool: &PgPool,
        user_id: DbId,
        except_token: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET logged_out_at = now()
             WHERE user_id = $1 AND session_id != $2 AND logged_out_at IS NULL",
        )
        .bind(user_id)
        .bind(except_token)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Touch a session's last-active timestamp. Conditional on the token,
    /// so a race with logout or deletion is a harmless no-op.
    pub async fn touch_last_active(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sessions SET last_active = now() WHERE session_id = $1")
            .bind(token)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete sessions past their expiry. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < now()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
