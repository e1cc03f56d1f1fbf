//! Rideline API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! router assembly) so integration tests and the binary entrypoint can
//! both access them.

pub mod auth;
pub mod background;
pub mod config;
pub mod cookie;
pub mod email;
pub mod error;
pub mod handlers;
pub mod location;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
