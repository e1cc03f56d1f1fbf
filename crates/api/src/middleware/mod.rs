//! Authentication and authorization extractors.
//!
//! - [`auth::CurrentSession`] -- resolves the session token (cookie or
//!   bearer header) against the cache.
//! - [`rbac::RequireAdmin`] -- additionally requires the Admin or
//!   SuperAdmin role.

pub mod auth;
pub mod rbac;
