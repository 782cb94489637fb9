//! Background Expiry Sweepers
//!
//! Each shard gets its own Tokio task that wakes every sweep interval, takes
//! that shard's write lock, and drops the entries whose age exceeds their TTL.
//! Reads never check expiry, so these sweeps are what actually retire
//! entries.
//!
//! ## Design
//!
//! ```text
//!            watch::Sender<bool>  (one per cache)
//!                    │
//!       ┌────────────┼────────────┬────────────┐
//!       ▼            ▼            ▼            ▼
//!  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐
//!  │ task 0  │  │ task 1  │  │ task 2  │  │ task N  │
//!  │ tick /  │  │ tick /  │  │ tick /  │  │ tick /  │
//!  │ sweep   │  │ sweep   │  │ sweep   │  │ sweep   │
//!  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘
//!       ▼            ▼            ▼            ▼
//!    Shard 0      Shard 1      Shard 2      Shard N
//! ```
//!
//! A single shutdown signal stops every task. It cannot be reversed; a
//! stopped cache keeps serving reads and writes but never sweeps again.

use crate::storage::shard::Shard;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

/// A handle to the running per-shard sweepers.
///
/// When this handle is dropped, the sweeper tasks will be stopped.
#[derive(Debug)]
pub(crate) struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,

    /// Set by the first call to `stop`
    stopped: AtomicBool,

    /// One task per shard, taken by `join`
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ExpirySweeper {
    /// Spawns one sweeper task per shard on `runtime`.
    pub fn start<T>(shards: Arc<[Shard<T>]>, interval: Duration, runtime: &Handle) -> Self
    where
        T: Send + Sync + 'static,
    {
        let (shutdown_tx, _) = watch::channel(false);

        let tasks = (0..shards.len())
            .map(|index| {
                runtime.spawn(sweeper_loop(
                    Arc::clone(&shards),
                    index,
                    interval,
                    shutdown_tx.subscribe(),
                ))
            })
            .collect();

        debug!(
            shards = shards.len(),
            interval_ms = interval.as_millis(),
            "Expiry sweepers started"
        );

        Self {
            shutdown_tx,
            stopped: AtomicBool::new(false),
            tasks: Mutex::new(tasks),
        }
    }

    /// Signals every sweeper task to exit.
    ///
    /// Safe to call any number of times; only the first call has an effect.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shutdown_tx.send_replace(true);
        info!("Background expiry sweepers stopped");
    }

    /// Returns true once `stop` has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Stops the sweepers and waits for every task to finish.
    pub async fn join(&self) {
        self.stop();

        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));

        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Expiry sweeper task did not exit cleanly");
            }
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The sweep loop for a single shard.
async fn sweeper_loop<T>(
    shards: Arc<[Shard<T>]>,
    index: usize,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    // Fixed-rate ticks; the first one is one full interval out.
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // Wait for the next tick or shutdown signal
        tokio::select! {
            _ = ticker.tick() => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    break;
                }
                continue;
            }
        }

        let expired = shards[index].sweep_expired(Instant::now());

        if expired > 0 {
            debug!(shard = index, expired = expired, "Expired entries cleaned up");
        } else {
            trace!(shard = index, "Sweep found nothing to expire");
        }
    }

    debug!(shard = index, "Expiry sweeper received shutdown signal");
}
