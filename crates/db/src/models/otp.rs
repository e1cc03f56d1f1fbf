//! One-time-code audit model.

use rideline_core::types::{DbId, Timestamp};

/// DTO for inserting a one-time-code audit row.
#[derive(Debug)]
pub struct CreateOtpCode {
    pub email: String,
    pub otp_code: String,
    pub user_id: Option<DbId>,
    pub purpose: String,
    pub expires_at: Timestamp,
}
