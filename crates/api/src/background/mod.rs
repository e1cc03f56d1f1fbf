//! Background tasks.
//!
//! Each submodule provides a long-running async worker intended to be
//! spawned via `tokio::spawn`. All workers accept a [`CancellationToken`]
//! for graceful shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod cleanup;
pub mod session_touch;
