//! Domain error taxonomy.
//!
//! These variants map one-to-one onto client-visible failure classes; the
//! HTTP layer decides status codes and response bodies. `InvalidCredentials`
//! deliberately carries no detail so an unknown identifier and a wrong
//! password are indistinguishable to the caller.

use thiserror::Error;

/// Domain-level error shared across the workspace.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad identifier/password pair. Covers both "no such user" and
    /// "wrong password".
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, expired, or unresolvable session token.
    #[error("{0}")]
    Unauthorized(String),

    /// Valid identity, insufficient privilege.
    #[error("{0}")]
    Forbidden(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Human-readable entity name (e.g. `"user"`, `"session"`).
        entity: &'static str,
    },

    /// Malformed request body or invalid field value.
    #[error("{0}")]
    Validation(String),

    /// Unique-constraint style conflict (duplicate username/email).
    #[error("{0}")]
    Conflict(String),

    /// Store/cache/serialization failure. The message is logged server-side
    /// and never returned to the client verbatim.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::Unauthorized`] with the standard message.
    pub fn unauthorized() -> Self {
        CoreError::Unauthorized("unauthorized".into())
    }

    /// Shorthand for [`CoreError::Forbidden`] with the standard message.
    pub fn forbidden() -> Self {
        CoreError::Forbidden("forbidden".into())
    }
}
