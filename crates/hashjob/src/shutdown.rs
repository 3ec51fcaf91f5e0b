//! Shutdown coordination and drain tracking.
//!
//! [`ShutdownCoordinator`] is a two-phase state machine: it starts out
//! accepting work and moves to draining exactly once. Outstanding digest
//! workers are counted with an atomic counter; each one holds a
//! [`WorkerGuard`] that releases its slot when dropped, so the count stays
//! correct even if a worker task unwinds.
//!
//! The phase lives in an atomic flag beside the counter, and both are accessed
//! with `SeqCst`. A submission increments the counter *before* it reads the
//! flag, and [`drain`](ShutdownCoordinator::drain) sets the flag *before* it
//! reads the counter. Under a single total order at least one side sees the
//! other: either the submission sees draining and backs out, or the drain sees
//! the submission's increment and waits for it. A [`CancellationToken`] is
//! cancelled afterwards only to wake tasks awaiting
//! [`draining`](ShutdownCoordinator::draining).

use core::time::Duration;
use portable_atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How often [`ShutdownCoordinator::drain`] re-checks the outstanding count.
pub const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// The coordinator's lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// New submissions are accepted.
    Accepting,
    /// New submissions are rejected; outstanding workers are finishing.
    Draining,
}

/// Tracks the accepting/draining phase and the number of outstanding workers.
#[derive(Clone, Debug, Default)]
pub struct ShutdownCoordinator {
    draining: Arc<AtomicBool>,
    token: CancellationToken,
    outstanding: Arc<AtomicUsize>,
}

/// Registration of one outstanding digest worker.
///
/// Dropping the guard marks the worker as finished.
#[derive(Debug)]
#[must_use = "dropping the guard immediately releases the worker slot"]
pub struct WorkerGuard {
    outstanding: Arc<AtomicUsize>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ShutdownCoordinator {
    /// Creates a coordinator in the [`Phase::Accepting`] phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.is_draining() {
            Phase::Draining
        } else {
            Phase::Accepting
        }
    }

    /// Whether shutdown has been initiated.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    /// Number of workers registered and not yet finished.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Registers a new outstanding worker, unless the coordinator is draining.
    pub fn register(&self) -> Option<WorkerGuard> {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        let guard = WorkerGuard {
            outstanding: Arc::clone(&self.outstanding),
        };

        if self.is_draining() {
            // Dropping the guard undoes the increment.
            return None;
        }

        Some(guard)
    }

    /// Moves to [`Phase::Draining`]. Idempotent.
    pub fn begin_drain(&self) {
        self.draining.store(true, Ordering::SeqCst);
        self.token.cancel();
    }

    /// Resolves once [`begin_drain`](Self::begin_drain) has been called.
    pub async fn draining(&self) {
        self.token.cancelled().await;
    }

    /// Begins draining and waits until every registered worker has finished.
    ///
    /// There is no timeout: accepted work is always allowed to complete.
    pub async fn drain(&self) {
        self.begin_drain();

        #[cfg(feature = "tracing")]
        tracing::info!("Draining outstanding workers ({} active)", self.outstanding());

        while self.outstanding() > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }

        #[cfg(feature = "tracing")]
        tracing::info!("All outstanding workers finished");
    }
}
