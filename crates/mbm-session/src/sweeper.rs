//! Background sweeping of expired entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Lower bound on the sweep interval; `tokio::time::interval` rejects zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running background sweeper.
///
/// Dropping the handle stops the sweeper at its next tick.
#[derive(Debug)]
pub struct SweeperHandle {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Whether the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a task that calls `sweep` every `interval`.
///
/// `sweep` returns the number of entries it evicted, or `None` once the
/// cache it sweeps is gone, which ends the task.
pub(crate) fn spawn<F>(interval: Duration, mut sweep: F) -> SweeperHandle
where
    F: FnMut() -> Option<usize> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let period = interval.max(MIN_SWEEP_INTERVAL);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        debug!(interval = ?period, "Session sweeper started");

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    match sweep() {
                        Some(0) => trace!("Sweep found no expired sessions"),
                        Some(count) => debug!(count, "Swept expired sessions"),
                        None => {
                            debug!("Session cache dropped, stopping sweeper");
                            break;
                        }
                    }
                }
            }
        }

        debug!("Session sweeper stopped");
    });

    SweeperHandle {
        cancel,
        handle: Some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_sweeps_on_interval_until_shutdown() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let handle = spawn(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(0)
        });

        tokio::time::sleep(Duration::from_millis(75)).await;
        handle.shutdown().await;

        let seen = calls.load(Ordering::SeqCst);
        assert!(seen >= 2, "expected several sweeps, saw {seen}");

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
    }

    #[tokio::test]
    async fn test_stops_when_sweep_reports_gone() {
        let handle = spawn(Duration::from_millis(5), || None);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let handle = spawn(Duration::ZERO, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(0)
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.shutdown().await;
        assert!(calls.load(Ordering::SeqCst) >= 1);
    }
}
