//! Authentication primitives and the session-issuing service.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`service`] -- credential check + cache-backed session lifecycle.

pub mod password;
pub mod service;
