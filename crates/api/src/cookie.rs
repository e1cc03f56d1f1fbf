//! Session cookie construction and token extraction.
//!
//! Browser clients carry the session token in the `session_id` cookie;
//! non-browser clients may send it as `Authorization: Bearer <token>`
//! instead. The cookie is HTTP-only and scoped to the whole site.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;

use crate::config::CookieConfig;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// Build the `Set-Cookie` value that establishes a session.
///
/// `max_age` matches the cache TTL so the cookie and the cache entry
/// expire together.
pub fn session_cookie(token: &str, max_age: Duration, config: &CookieConfig) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; Max-Age={}; SameSite={}",
        max_age.as_secs(),
        config.same_site.as_str()
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that clears the session cookie.
///
/// Uses the same attributes as [`session_cookie`] so browsers match the
/// cookie being replaced.
pub fn clear_session_cookie(config: &CookieConfig) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0; SameSite={}",
        config.same_site.as_str()
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract the session token from request headers.
///
/// Checks the `session_id` cookie first, then falls back to an
/// `Authorization: Bearer` header for non-browser clients.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = token_from_cookie(headers) {
        return Some(token);
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn token_from_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        if name == SESSION_COOKIE && !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}
