//! Database entity models and DTOs.

pub mod email_log;
pub mod otp;
pub mod preference;
pub mod session;
pub mod user;
