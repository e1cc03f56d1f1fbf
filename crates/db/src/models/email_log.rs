//! Outbound email audit model.

use rideline_core::types::DbId;

/// DTO for recording an email delivery attempt.
#[derive(Debug)]
pub struct CreateEmailLog {
    pub recipient_email: String,
    pub recipient_user_id: Option<DbId>,
    pub subject: String,
    pub email_type: String,
    pub status: String,
    pub error_message: Option<String>,
}
