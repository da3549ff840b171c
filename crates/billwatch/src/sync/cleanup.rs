//! Periodic removal of bill records past their retention period.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::SyncEngine;

/// Spawns a task that sweeps bills past retention every `interval` until a
/// shutdown signal arrives. A zero interval disables the task and returns `None`.
pub fn spawn_cleanup(
    engine: SyncEngine,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        tracing::info!("Periodic cache cleanup disabled");
        return None;
    }

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing has expired at startup.
        ticker.tick().await;

        tracing::debug!(interval_secs = interval.as_secs(), "Cache cleanup started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match engine.sweep_expired().await {
                        Ok(report) => tracing::debug!(
                            bills_removed = report.bills_removed,
                            "Expired cache entries swept"
                        ),
                        Err(err) => tracing::error!(error = %err, "Cache cleanup failed"),
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Cache cleanup shutting down");
                    break;
                }
            }
        }
    });

    Some(handle)
}
