//! Session store: `session:{token}` -> JSON session payload.

use std::sync::Arc;
use std::time::Duration;

use rideline_core::session::Session;

use crate::error::CacheError;
use crate::Cache;

const SESSION_PREFIX: &str = "session:";

/// Cache-backed session state. This is the source of truth for whether a
/// token is live; the relational `sessions` table only keeps history.
#[derive(Clone)]
pub struct SessionStore {
    cache: Arc<Cache>,
    ttl: Duration,
}

impl SessionStore {
    /// Build a store writing entries with the given TTL (the session
    /// lifetime, 24 h by default at the configuration layer).
    pub fn new(cache: Arc<Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// The TTL applied to new sessions.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Verify the underlying cache backend is reachable.
    pub async fn ping(&self) -> Result<(), CacheError> {
        self.cache.ping().await
    }

    fn key(token: &str) -> String {
        format!("{SESSION_PREFIX}{token}")
    }

    /// Store a session payload under its token.
    pub async fn put(&self, token: &str, session: &Session) -> Result<(), CacheError> {
        let payload = serde_json::to_string(session)?;
        self.cache.set(&Self::key(token), &payload, self.ttl).await
    }

    /// Resolve a token to its session, or `None` when absent or expired.
    pub async fn get(&self, token: &str) -> Result<Option<Session>, CacheError> {
        match self.cache.get(&Self::key(token)).await? {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Delete a session. Idempotent: deleting an absent token succeeds.
    pub async fn delete(&self, token: &str) -> Result<(), CacheError> {
        self.cache.delete(&Self::key(token)).await
    }

    /// Extend a live session's TTL by re-writing its payload. A token with
    /// no entry is left as-is (nothing to refresh).
    pub async fn refresh(&self, token: &str) -> Result<(), CacheError> {
        let key = Self::key(token);
        if let Some(payload) = self.cache.get(&key).await? {
            self.cache.set(&key, &payload, self.ttl).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_OP_TIMEOUT;

    fn store() -> SessionStore {
        let cache = Arc::new(Cache::in_memory(DEFAULT_OP_TIMEOUT));
        SessionStore::new(cache, Duration::from_secs(60))
    }

    fn sample_session() -> Session {
        Session {
            user_id: 7,
            username: "alice".into(),
            email: "alice@example.edu".into(),
            role: "user".into(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get_returns_same_payload() {
        let store = store();
        let session = sample_session();

        store.put("tok-1", &session).await.unwrap();
        let resolved = store.get("tok-1").await.unwrap();
        assert_eq!(resolved, Some(session));
    }

    #[tokio::test]
    async fn test_get_unknown_token_is_none() {
        let store = store();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();
        store.put("tok-2", &sample_session()).await.unwrap();

        store.delete("tok-2").await.unwrap();
        assert_eq!(store.get("tok-2").await.unwrap(), None);

        // Second delete of the same token does not error.
        store.delete("tok-2").await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_missing_token_is_noop() {
        let store = store();
        store.refresh("ghost").await.unwrap();
        assert_eq!(store.get("ghost").await.unwrap(), None);
    }
}
