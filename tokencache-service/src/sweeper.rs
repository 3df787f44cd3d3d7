//! Background purge of expired entries.
//!
//! Lazy eviction only reclaims keys that are read again. The sweeper bounds
//! memory for tokens that are written once and never looked up.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use tokencache_store::TtlStore;

/// Shortest interval the sweeper will tick at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running sweeper task.
///
/// The task stops when the handle is dropped, when [`stop`](Self::stop) is
/// called, or when the cache it sweeps is dropped.
#[derive(Debug)]
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweeper.
    pub fn stop(self) {
        drop(self);
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task purging expired entries every `interval`.
///
/// Holds only a weak reference, so the sweeper never keeps a cache alive.
/// Must be called from within a Tokio runtime.
pub(crate) fn spawn<V>(store: Weak<TtlStore<V>>, interval: Duration) -> SweeperHandle
where
    V: Clone + Send + Sync + 'static,
{
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(store) = store.upgrade() else {
                debug!("Token cache dropped, sweeper exiting");
                break;
            };

            let purged = store.purge_expired();
            if purged > 0 {
                debug!(purged, remaining = store.len(), "Swept expired tokens");
            }
        }
    });

    info!(interval_ms = interval.as_millis() as u64, "Token cache sweeper started");

    SweeperHandle { handle }
}
