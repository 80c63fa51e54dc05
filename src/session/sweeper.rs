//! Periodic sweep of stale sessions

use super::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn the background sweep task.
///
/// Runs on a fixed interval until `cancel` fires, so shutdown (and tests)
/// never leak the timer. The sweep is a courtesy cleanup, independent of
/// any in-flight dialogue.
pub fn spawn_sweeper(
    store: Arc<SessionStore>,
    interval: Duration,
    max_age: chrono::Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // An interval's first tick completes immediately; a fresh store has
        // nothing to sweep, so consume it up front.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = store.sweep(max_age).await;
                    if removed > 0 {
                        tracing::info!(removed, "Swept stale sessions");
                    }
                }
            }
        }

        tracing::debug!("Session sweeper stopped");
    })
}
