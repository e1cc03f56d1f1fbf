//! Best-effort session last-active updates.
//!
//! The authorization extractor records a touch for every authenticated
//! request, but the handler must never wait on (or fail because of) the
//! metadata write. Touches therefore go through a bounded queue into a
//! single worker that owns a pool handle; overflow drops the touch and a
//! failed UPDATE is logged and forgotten. The UPDATE is conditional on
//! the token, so a race with logout or revocation is a harmless no-op.

use sqlx::PgPool;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use rideline_db::repositories::SessionRepo;

/// Queue capacity. At steady state the worker drains faster than requests
/// arrive; under a pool stall the queue fills and touches are shed.
const QUEUE_CAPACITY: usize = 1024;

/// Cheap handle for enqueuing last-active touches.
#[derive(Clone)]
pub struct SessionTouch {
    tx: mpsc::Sender<String>,
}

impl SessionTouch {
    /// Record that `token` was just used. Never blocks; a full queue or a
    /// stopped worker drops the touch.
    pub fn record(&self, token: &str) {
        if let Err(e) = self.tx.try_send(token.to_string()) {
            tracing::debug!(error = %e, "session touch dropped");
        }
    }

    #[cfg(test)]
    pub(crate) fn for_test(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

/// Spawn the touch worker. Returns the enqueue handle and the worker's
/// join handle for shutdown.
pub fn spawn(pool: PgPool, cancel: CancellationToken) -> (SessionTouch, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    let handle = tokio::spawn(run(pool, rx, cancel));
    (SessionTouch { tx }, handle)
}

async fn run(pool: PgPool, mut rx: mpsc::Receiver<String>, cancel: CancellationToken) {
    tracing::info!(capacity = QUEUE_CAPACITY, "session touch worker started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("session touch worker stopping");
                break;
            }
            token = rx.recv() => {
                let Some(token) = token else { break };
                if let Err(e) = SessionRepo::touch_last_active(&pool, &token).await {
                    tracing::warn!(error = %e, "session touch failed");
                }
            }
        }
    }
}
