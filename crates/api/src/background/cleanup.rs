//! Periodic purge of expired session and one-time-code rows.
//!
//! Neither table is consulted for validity (the cache is), so stale rows
//! are only disk weight and audit noise. Sessions older than their expiry
//! are gone from every view the API offers except login history, which
//! keeps its own limit; unverified codes past expiry can never be
//! consumed again.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use rideline_db::repositories::{OtpRepo, SessionRepo};

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "store cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("store cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::cleanup_expired(&pool).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "purged expired sessions");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "session cleanup failed");
                    }
                }
                match OtpRepo::cleanup_expired(&pool).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "purged stale one-time codes");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "one-time-code cleanup failed");
                    }
                }
            }
        }
    }
}
