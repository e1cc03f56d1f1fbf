//! Key-value cache layer.
//!
//! The cache holds the authoritative session state and the fast path for
//! one-time codes. Two backends exist behind the [`Cache`] handle:
//!
//! - [`redis::RedisCache`] -- the production backend (shared across
//!   instances, native TTL expiry).
//! - [`memory::MemoryCache`] -- in-process backend for tests and
//!   cache-less single-node development.
//!
//! Every operation is bounded by a per-call deadline; an overrun surfaces
//! as [`error::CacheError::Timeout`] rather than hanging the request.

use std::time::Duration;

pub mod error;
pub mod memory;
pub mod otp;
pub mod redis;
pub mod session;

use self::error::CacheError;
use self::memory::MemoryCache;
use self::redis::RedisCache;

/// Default per-operation deadline.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

enum Backend {
    Redis(RedisCache),
    Memory(MemoryCache),
}

/// Backend-agnostic cache handle.
///
/// Values are plain strings; callers that need structured payloads (the
/// session store) serialize to JSON themselves.
pub struct Cache {
    backend: Backend,
    op_timeout: Duration,
}

impl Cache {
    /// Connect to Redis and verify the connection with a PING.
    pub async fn connect_redis(url: &str, op_timeout: Duration) -> Result<Self, CacheError> {
        let backend = RedisCache::connect(url)?;
        let cache = Self {
            backend: Backend::Redis(backend),
            op_timeout,
        };
        cache.ping().await?;
        Ok(cache)
    }

    /// Build an in-process cache.
    pub fn in_memory(op_timeout: Duration) -> Self {
        Self {
            backend: Backend::Memory(MemoryCache::new()),
            op_timeout,
        }
    }

    /// Get the value stored under `key`, or `None` when absent or expired.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.bounded("GET", async {
            match &self.backend {
                Backend::Redis(c) => c.get(key).await,
                Backend::Memory(c) => Ok(c.get(key).await),
            }
        })
        .await
    }

    /// Store `value` under `key` with the given TTL.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.bounded("SET", async {
            match &self.backend {
                Backend::Redis(c) => c.set(key, value, ttl).await,
                Backend::Memory(c) => {
                    c.set(key, value, ttl).await;
                    Ok(())
                }
            }
        })
        .await
    }

    /// Delete `key`. Deleting an absent key is not an error.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.bounded("DEL", async {
            match &self.backend {
                Backend::Redis(c) => c.delete(key).await,
                Backend::Memory(c) => {
                    c.delete(key).await;
                    Ok(())
                }
            }
        })
        .await
    }

    /// Check whether `key` exists and has not expired.
    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.bounded("EXISTS", async {
            match &self.backend {
                Backend::Redis(c) => c.exists(key).await,
                Backend::Memory(c) => Ok(c.get(key).await.is_some()),
            }
        })
        .await
    }

    /// Verify the backend is reachable.
    pub async fn ping(&self) -> Result<(), CacheError> {
        self.bounded("PING", async {
            match &self.backend {
                Backend::Redis(c) => c.ping().await,
                Backend::Memory(_) => Ok(()),
            }
        })
        .await
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl std::future::Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(op)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_round_trip() {
        let cache = Cache::in_memory(DEFAULT_OP_TIMEOUT);
        cache
            .set("k", "v", Duration::from_secs(60))
            .await
            .expect("set should succeed");

        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
        assert!(cache.exists("k").await.unwrap());

        cache.delete("k").await.expect("delete should succeed");
        assert_eq!(cache.get("k").await.unwrap(), None);

        // Deleting an absent key is a no-op, not an error.
        cache.delete("k").await.expect("second delete is idempotent");
    }

    #[tokio::test]
    async fn test_memory_backend_respects_ttl() {
        let cache = Cache::in_memory(DEFAULT_OP_TIMEOUT);
        cache
            .set("gone", "v", Duration::ZERO)
            .await
            .expect("set should succeed");

        assert_eq!(cache.get("gone").await.unwrap(), None);
        assert!(!cache.exists("gone").await.unwrap());
    }
}
