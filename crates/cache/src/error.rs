//! Cache error type.

use thiserror::Error;

/// Failures from the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Transport or server-side Redis failure.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored payload could not be (de)serialized.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The per-call deadline elapsed. There is no retry; the caller
    /// reports the operation as failed.
    #[error("cache operation {0} timed out")]
    Timeout(&'static str),
}
