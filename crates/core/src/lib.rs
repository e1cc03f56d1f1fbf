//! Shared domain types for the rideline backend.
//!
//! - [`error`] -- domain error taxonomy shared by all crates.
//! - [`types`] -- primitive type aliases (ids, timestamps).
//! - [`roles`] -- well-known role names and allow-list matching.
//! - [`session`] -- the cache-resident session payload.
//! - [`otp`] -- one-time-code generation.

pub mod error;
pub mod otp;
pub mod roles;
pub mod session;
pub mod types;
