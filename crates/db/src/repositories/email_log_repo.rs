//! Repository for the `email_logs` audit table.

use sqlx::PgPool;

use crate::models::email_log::CreateEmailLog;

/// Provides data access for outbound email audit rows.
pub struct EmailLogRepo;

impl EmailLogRepo {
    /// Record a delivery attempt (sent or failed).
    pub async fn insert(pool: &PgPool, input: &CreateEmailLog) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO email_logs
                 (recipient_email, recipient_user_id, subject, email_type, status, error_message)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&input.recipient_email)
        .bind(input.recipient_user_id)
        .bind(&input.subject)
        .bind(&input.email_type)
        .bind(&input.status)
        .bind(&input.error_message)
        .execute(pool)
        .await?;
        Ok(())
    }
}
