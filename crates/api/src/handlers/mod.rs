//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to `rideline_db` repositories and the cache stores,
//! and map errors via [`AppError`](crate::error::AppError). Every endpoint
//! returns an explicit typed response struct, never an ad hoc map.

pub mod auth;
pub mod preferences;
pub mod sessions;
pub mod users;

use serde::Serialize;

/// Plain acknowledgement body shared by operations with nothing to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
