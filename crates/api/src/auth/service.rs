//! Authentication service: credential check plus cache-backed session
//! lifecycle.
//!
//! The service is the only writer of cache-resident session state. Session
//! *metadata* (device, IP, location) and the client cookie are orchestration
//! concerns handled by the login handler, not here.

use uuid::Uuid;

use rideline_cache::session::SessionStore;
use rideline_core::error::CoreError;
use rideline_core::session::Session;
use rideline_db::repositories::UserRepo;
use rideline_db::DbPool;

use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};

/// Issues, resolves, and revokes sessions.
#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(pool: DbPool, sessions: SessionStore) -> Self {
        Self { pool, sessions }
    }

    /// Authenticate `identifier` (username or email, exact match) against
    /// `password` and create a session.
    ///
    /// Both "no such user" and "wrong password" fail with
    /// [`CoreError::InvalidCredentials`]; transient store failures surface
    /// as distinct internal errors.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<(Session, String)> {
        let user = UserRepo::find_by_identifier(&self.pool, identifier)
            .await?
            .ok_or_else(|| {
                tracing::debug!(identifier, "login identifier not found");
                AppError::Core(CoreError::InvalidCredentials)
            })?;

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification error: {e}")))?;

        if !password_valid {
            tracing::debug!(username = %user.username, "password mismatch");
            return Err(AppError::Core(CoreError::InvalidCredentials));
        }

        let session = Session {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        };

        // Opaque, unguessable token. The cache entry is what makes it valid.
        let token = Uuid::new_v4().to_string();
        self.sessions.put(&token, &session).await?;

        tracing::info!(user_id = session.user_id, "session created");
        Ok((session, token))
    }

    /// Resolve a token to its live session.
    pub async fn session(&self, token: &str) -> AppResult<Session> {
        self.sessions
            .get(token)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::unauthorized()))
    }

    /// Delete the cache entry for `token`. Idempotent: revoking an absent
    /// or already-expired token succeeds.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.sessions.delete(token).await?;
        Ok(())
    }
}
