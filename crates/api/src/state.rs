use std::sync::Arc;

use rideline_cache::otp::OtpStore;
use rideline_cache::session::SessionStore;
use rideline_db::DbPool;

use crate::auth::service::AuthService;
use crate::background::session_touch::SessionTouch;
use crate::config::ServerConfig;
use crate::email::Mailer;
use crate::location::GeoLocator;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Credential check plus session issue/resolve/revoke.
    pub auth: AuthService,
    /// Cache-backed session state (authoritative for token validity).
    pub sessions: SessionStore,
    /// Cache-backed one-time codes.
    pub otps: OtpStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound mailer; `None` when SMTP is not configured.
    pub mailer: Option<Arc<Mailer>>,
    /// Handle to the last-active touch worker.
    pub touch: SessionTouch,
    /// Best-effort IP geolocation for session provenance.
    pub geo: GeoLocator,
}
