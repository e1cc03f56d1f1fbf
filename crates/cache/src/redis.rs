//! Redis cache backend.

use std::time::Duration;

use redis::{AsyncCommands, Client};

use crate::error::CacheError;

/// Thin wrapper over the redis client. Connections are multiplexed, so
/// cloning handles out per request is unnecessary.
pub struct RedisCache {
    client: Client,
}

impl RedisCache {
    /// Build a client for the given URL (e.g. `redis://localhost:6379`).
    ///
    /// The connection itself is established lazily; call
    /// [`RedisCache::ping`] to verify reachability at startup.
    pub fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        Ok(conn.get(key).await?)
    }

    /// `SET key value EX ttl`. A zero TTL stores nothing meaningful on the
    /// Redis side, so it is clamped to one second.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let secs = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, secs).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: u64 = conn.del(key).await?;
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection().await?;
        let count: u64 = conn.exists(key).await?;
        Ok(count > 0)
    }

    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "requires running Redis server"]
    async fn test_set_get_delete() {
        let cache = RedisCache::connect(&test_url()).expect("client should build");
        cache.ping().await.expect("redis should be reachable");

        cache
            .set("rideline_test_key", "v", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(
            cache.get("rideline_test_key").await.unwrap(),
            Some("v".to_string())
        );

        cache.delete("rideline_test_key").await.unwrap();
        assert_eq!(cache.get("rideline_test_key").await.unwrap(), None);
    }
}
