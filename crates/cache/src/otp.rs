//! One-time-code store: `otp:{email}` -> raw numeric code string.

use std::sync::Arc;
use std::time::Duration;

use crate::error::CacheError;
use crate::Cache;

const OTP_PREFIX: &str = "otp:";

/// Cache-backed one-time codes. The short TTL is the expiry mechanism; the
/// `otp_codes` table is audit only.
#[derive(Clone)]
pub struct OtpStore {
    cache: Arc<Cache>,
    ttl: Duration,
}

impl OtpStore {
    pub fn new(cache: Arc<Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// The TTL applied to stored codes.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn key(email: &str) -> String {
        format!("{OTP_PREFIX}{email}")
    }

    /// Store a code for an email, replacing any outstanding one.
    pub async fn put(&self, email: &str, code: &str) -> Result<(), CacheError> {
        self.cache.set(&Self::key(email), code, self.ttl).await
    }

    /// Read the outstanding code for an email, if any.
    pub async fn get(&self, email: &str) -> Result<Option<String>, CacheError> {
        self.cache.get(&Self::key(email)).await
    }

    /// Check a submitted code against the stored one. Absent or expired
    /// entries simply do not match; the caller cannot tell which.
    pub async fn matches(&self, email: &str, code: &str) -> Result<bool, CacheError> {
        match self.cache.get(&Self::key(email)).await? {
            Some(stored) => Ok(stored == code),
            None => Ok(false),
        }
    }

    /// Remove the code for an email. Idempotent.
    pub async fn delete(&self, email: &str) -> Result<(), CacheError> {
        self.cache.delete(&Self::key(email)).await
    }
}
