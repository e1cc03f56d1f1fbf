//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod email_log_repo;
pub mod otp_repo;
pub mod preference_repo;
pub mod session_repo;
pub mod user_repo;

pub use email_log_repo::EmailLogRepo;
pub use otp_repo::OtpRepo;
pub use preference_repo::PreferenceRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
