//! Server configuration.
//!
//! Loaded once at startup into an immutable struct and passed to every
//! component through [`crate::state::AppState`] -- no process-wide globals.

use std::time::Duration;

use crate::email::EmailConfig;

/// `SameSite` policy applied to the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Session cookie attributes.
///
/// Cross-origin deployments need `SameSite=None`, which browsers only honor
/// together with `Secure`; both stay off by default for local development.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub same_site: SameSite,
    pub secure: bool,
}

/// Server configuration loaded from environment variables.
///
/// All fields except `DATABASE_URL` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Application name reported by the health endpoint.
    pub app_name: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// Empty means wildcard origins without credentials.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Redis connection URL. `None` selects the in-process cache backend.
    pub redis_url: Option<String>,
    /// Session lifetime; also the cache TTL and cookie Max-Age.
    pub session_ttl: Duration,
    /// One-time-code lifetime.
    pub otp_ttl: Duration,
    /// Per-operation cache deadline.
    pub cache_op_timeout: Duration,
    /// Session cookie attributes.
    pub cookie: CookieConfig,
    /// SMTP settings; `None` disables outbound email.
    pub email: Option<EmailConfig>,
}

/// Default session lifetime in hours.
const DEFAULT_SESSION_TTL_HOURS: u64 = 24;
/// Default one-time-code lifetime in minutes.
const DEFAULT_OTP_TTL_MINS: u64 = 5;
/// Default per-operation cache deadline in seconds.
const DEFAULT_CACHE_OP_TIMEOUT_SECS: u64 = 5;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default      |
    /// |--------------------------|--------------|
    /// | `APP_NAME`               | `rideline`   |
    /// | `HOST`                   | `0.0.0.0`    |
    /// | `PORT`                   | `3000`       |
    /// | `CORS_ORIGINS`           | (empty)      |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`         |
    /// | `REDIS_URL`              | (unset)      |
    /// | `SESSION_TTL_HOURS`      | `24`         |
    /// | `OTP_TTL_MINS`           | `5`          |
    /// | `CACHE_OP_TIMEOUT_SECS`  | `5`          |
    /// | `COOKIE_SAMESITE`        | `Lax`        |
    /// | `COOKIE_SECURE`          | `false`      |
    pub fn from_env() -> Self {
        let app_name = std::env::var("APP_NAME").unwrap_or_else(|_| "rideline".into());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session_ttl_hours: u64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_HOURS.to_string())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid u64");

        let otp_ttl_mins: u64 = std::env::var("OTP_TTL_MINS")
            .unwrap_or_else(|_| DEFAULT_OTP_TTL_MINS.to_string())
            .parse()
            .expect("OTP_TTL_MINS must be a valid u64");

        let cache_op_timeout_secs: u64 = std::env::var("CACHE_OP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_CACHE_OP_TIMEOUT_SECS.to_string())
            .parse()
            .expect("CACHE_OP_TIMEOUT_SECS must be a valid u64");

        // SameSite=None is opt-in; Secure is only honored alongside it.
        let same_site = match std::env::var("COOKIE_SAMESITE").as_deref() {
            Ok("None") => SameSite::None,
            _ => SameSite::Lax,
        };
        let secure = same_site == SameSite::None
            && std::env::var("COOKIE_SECURE").as_deref() == Ok("true");

        Self {
            app_name,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            redis_url: std::env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            session_ttl: Duration::from_secs(session_ttl_hours * 3600),
            otp_ttl: Duration::from_secs(otp_ttl_mins * 60),
            cache_op_timeout: Duration::from_secs(cache_op_timeout_secs),
            cookie: CookieConfig { same_site, secure },
            email: EmailConfig::from_env(),
        }
    }
}
