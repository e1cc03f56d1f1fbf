//! In-process cache backend.
//!
//! Backed by a moka future cache with a bounded capacity. moka's own TTL is
//! cache-wide, so each entry carries its expiry instant and reads treat a
//! stale entry as a miss (and evict it).

use std::time::{Duration, Instant};

use moka::future::Cache as MokaCache;

/// Maximum number of entries before moka starts evicting.
const MAX_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory string cache with per-entry TTL.
pub struct MemoryCache {
    cache: MokaCache<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            cache: MokaCache::builder().max_capacity(MAX_CAPACITY).build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let entry = self.cache.get(key).await?;
        if entry.expires_at <= Instant::now() {
            self.cache.invalidate(key).await;
            return None;
        }
        Some(entry.value)
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
    }

    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}
