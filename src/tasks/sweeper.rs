//! Expiration Sweeper
//!
//! Background task that periodically removes expired entries from a store.
//!
//! The task holds only a weak reference to its store. It terminates when the
//! stop signal is sent, when the stop sender is dropped together with its
//! [`Sweeper`], or when the store is gone at the next tick.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::Store;
use crate::error::{CacheError, Result};

// == Sweeper ==
/// Handle to a running expiration sweeper.
///
/// The sweeper is either running or stopped; once stopped it cannot be
/// restarted. Dropping the handle stops the task.
#[derive(Debug)]
pub struct Sweeper {
    /// Stop signal, taken on the first `stop`
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
    /// Background task handle
    handle: JoinHandle<()>,
}

impl Sweeper {
    // == Spawn ==
    /// Spawns a sweeper on the current tokio runtime.
    ///
    /// The first sweep runs one full `interval` after spawning. Intervals
    /// longer than a year are capped to one year.
    ///
    /// # Arguments
    /// * `store` - The store to sweep
    /// * `interval` - Time between sweeps, must be non-zero
    ///
    /// # Errors
    /// - [`CacheError::ZeroSweepInterval`] if `interval` is zero
    /// - [`CacheError::RuntimeUnavailable`] if called outside a tokio runtime
    pub fn spawn<V>(store: &Arc<Store<V>>, interval: Duration) -> Result<Self>
    where
        V: Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(CacheError::ZeroSweepInterval);
        }
        let runtime = Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;

        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = runtime.spawn(run(Arc::downgrade(store), interval, stop_rx));

        Ok(Self {
            stop_tx: Mutex::new(Some(stop_tx)),
            handle,
        })
    }

    // == Stop ==
    /// Signals the sweeper to stop.
    ///
    /// Never blocks. Calling it again, or after the task has already ended,
    /// does nothing.
    pub fn stop(&self) {
        if let Some(stop_tx) = self.stop_tx.lock().take() {
            // The receiver is gone if the task already ended on its own
            let _ = stop_tx.send(());
            debug!("Expiration sweeper stop requested");
        }
    }

    // == Is Finished ==
    /// Returns true once the background task has terminated.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Longest interval between sweeps; larger requests are capped to it.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Sweep loop: one `delete_expired` per tick until stopped.
async fn run<V>(store: Weak<Store<V>>, period: Duration, mut stop_rx: oneshot::Receiver<()>) {
    // Capped so the first deadline always fits in an Instant
    let period = period.min(MAX_SWEEP_INTERVAL);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval = ?period, "Expiration sweeper started");

    loop {
        tokio::select! {
            biased;
            // Resolves on an explicit stop or when the sender is dropped
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {
                let Some(store) = store.upgrade() else {
                    debug!("Store dropped, ending sweep loop");
                    break;
                };

                let removed = store.delete_expired();
                if removed > 0 {
                    debug!(removed, "Sweep removed expired entries");
                }
            }
        }
    }

    info!("Expiration sweeper stopped");
}
