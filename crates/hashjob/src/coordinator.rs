//! Submission and completion coordination.
//!
//! [`HashCoordinator`] is the entry point the HTTP layer uses. For each
//! submission it allocates a job ID from the [`JobStore`], registers the
//! worker with the [`ShutdownCoordinator`], and spawns a digest worker that
//! records its result when done. The caller gets the ID back without waiting
//! on the hash.
//!
//! ## Invariants
//!
//! - Exactly one digest worker is spawned per allocated job ID, so each ID is
//!   recorded at most once.
//! - No ID is allocated once draining has begun.

use crate::{
    digest,
    error::{Error, Result},
    shutdown::ShutdownCoordinator,
    store::JobStore,
    types::{JobId, Stats},
};
use core::time::Duration;

/// Runtime settings for a [`HashCoordinator`].
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorConfig {
    /// Artificial delay before each digest is computed.
    pub hash_wait: Duration,
    /// First job ID handed out.
    pub first_job_id: JobId,
    /// Capacity of the job store's request queue.
    pub queue_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            hash_wait: Duration::from_secs(5),
            first_job_id: crate::types::FIRST_JOB_ID,
            queue_capacity: 1024,
        }
    }
}

/// Accepts hashing jobs and answers queries about them.
///
/// Cheap to clone; all clones share the same store and shutdown state.
#[derive(Clone, Debug)]
pub struct HashCoordinator {
    store: JobStore,
    shutdown: ShutdownCoordinator,
    hash_wait: Duration,
}

impl HashCoordinator {
    /// Spawns a job store on the current Tokio runtime and wraps it.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "coordinator_new", skip_all, fields(hash_wait = ?config.hash_wait)))]
    pub fn new(config: CoordinatorConfig) -> Self {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting job store at id {} with queue capacity {}",
            config.first_job_id,
            config.queue_capacity
        );

        Self {
            store: JobStore::spawn(config.first_job_id, config.queue_capacity),
            shutdown: ShutdownCoordinator::new(),
            hash_wait: config.hash_wait,
        }
    }

    /// Accepts `payload` for hashing and returns its job ID immediately.
    ///
    /// # Errors
    ///
    /// - [`Error::ServiceShutdown`] once draining has begun; nothing is
    ///   allocated.
    /// - [`Error::InvalidRequest`] for an empty payload.
    /// - [`Error::IdsExhausted`] once the job ID sequence has run out.
    /// - [`Error::ChannelError`] if the job store is gone.
    pub async fn submit(&self, payload: impl Into<Vec<u8>>) -> Result<JobId> {
        let Some(guard) = self.shutdown.register() else {
            return Err(Error::ServiceShutdown);
        };

        let payload = payload.into();
        if payload.is_empty() {
            return Err(Error::InvalidRequest {
                reason: "Payload must not be empty".to_string(),
            });
        }

        let id = self.store.allocate().await?;
        let store = self.store.clone();
        let hash_wait = self.hash_wait;

        tokio::spawn(async move {
            let entry = digest::run(id, payload, hash_wait).await;
            if let Err(_e) = store.record(entry).await {
                #[cfg(feature = "tracing")]
                tracing::error!("Failed to record job {}: {}", id, _e);
            }
            // Release only after the store has acknowledged the entry.
            drop(guard);
        });

        Ok(id)
    }

    /// Returns the hex digest for `id`, if it has completed.
    pub async fn lookup(&self, id: JobId) -> Result<Option<String>> {
        self.store.lookup(id).await
    }

    /// Returns a snapshot of the job statistics.
    pub async fn stats(&self) -> Result<Stats> {
        self.store.stats().await
    }

    /// Number of digest workers still running.
    pub fn outstanding(&self) -> usize {
        self.shutdown.outstanding()
    }

    /// The shared shutdown state.
    pub fn shutdown_state(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Stops accepting submissions and waits for all running workers to record
    /// their results.
    pub async fn shutdown(&self) {
        #[cfg(feature = "tracing")]
        tracing::info!("Refusing new submissions");

        self.shutdown.drain().await;

        #[cfg(feature = "tracing")]
        tracing::info!("Coordinator shutdown complete");
    }
}
