//! Repository for the `otp_codes` audit table.

use sqlx::PgPool;

use rideline_core::types::DbId;

use crate::models::otp::CreateOtpCode;

/// Provides data access for one-time-code audit rows.
pub struct OtpRepo;

impl OtpRepo {
    /// Insert an audit row for a freshly issued code.
    pub async fn insert(pool: &PgPool, input: &CreateOtpCode) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO otp_codes (email, otp_code, user_id, purpose, expires_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&input.email)
        .bind(&input.otp_code)
        .bind(input.user_id)
        .bind(&input.purpose)
        .bind(input.expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a code verified. The guard ("not yet verified AND not expired")
    /// lives in the same UPDATE, so a code is consumable at most once even
    /// under concurrent verification attempts.
    ///
    /// Returns `false` when no consumable row matched.
    pub async fn consume(pool: &PgPool, email: &str, code: &str) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "UPDATE otp_codes
             SET verified = true, verified_at = now()
             WHERE email = $1
               AND otp_code = $2
               AND verified = false
               AND expires_at > now()
             RETURNING id",
        )
        .bind(email)
        .bind(code)
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    /// Purge stale unverified rows. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM otp_codes WHERE verified = false AND expires_at < now()")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
