use super::{
    request::StoreRequest,
    table::{JobTable, Recorded},
};
use crate::{
    error::{Error, Result},
    types::{JobEntry, JobId, Stats},
};
use tokio::sync::{mpsc, oneshot};

/// Task that owns the [`JobTable`] and serves [`StoreRequest`]s one at a time.
///
/// Because only this task ever touches the table, every request observes the
/// effects of all requests processed before it and none after. The loop exits
/// once every [`JobStore`] handle has been dropped.
pub(crate) async fn store_loop(mut rx: mpsc::Receiver<StoreRequest>, mut table: JobTable) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Job store started");

    while let Some(request) = rx.recv().await {
        match request {
            StoreRequest::Allocate { response } => {
                let id = table.allocate();
                #[cfg(feature = "tracing")]
                match id {
                    Some(id) => tracing::debug!("Allocated job {}", id),
                    None => tracing::error!("Job ID sequence exhausted"),
                }
                // A dropped receiver just means the caller went away; the ID
                // stays consumed either way.
                let _ = response.send(id);
            }
            StoreRequest::Record { entry, response } => {
                let _id = entry.id;
                match table.record(entry) {
                    Recorded::Inserted => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            total = table.stats().total,
                            average = table.stats().average,
                            "Recorded job {}",
                            _id
                        );
                    }
                    Recorded::Duplicate => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("Ignoring duplicate completion for job {}", _id);
                    }
                }
                let _ = response.send(());
            }
            StoreRequest::Lookup { id, response } => {
                #[cfg(feature = "tracing")]
                tracing::trace!("Looking up job {}", id);
                let _ = response.send(table.lookup(id).map(str::to_owned));
            }
            StoreRequest::Stats { response } => {
                let _ = response.send(table.stats());
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Job store stopped with {} entries", table.len());
}

/// Cloneable handle to the job store task.
///
/// All four operations are linearizable: each one is a single message
/// processed in full by the store task before the next is looked at.
#[derive(Clone, Debug)]
pub struct JobStore {
    tx: mpsc::Sender<StoreRequest>,
}

impl JobStore {
    /// Spawns the store task on the current Tokio runtime.
    ///
    /// `first_id` is the first ID [`allocate`](Self::allocate) returns.
    /// `capacity` bounds the request queue; callers wait for room when it is
    /// full. A capacity of zero is treated as one.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn(first_id: JobId, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(store_loop(rx, JobTable::new(first_id)));
        Self { tx }
    }

    /// Returns the next unused job ID.
    ///
    /// Fails with [`Error::IdsExhausted`] once `JobId::MAX` has been handed
    /// out; the store keeps serving every other request.
    pub async fn allocate(&self) -> Result<JobId> {
        self.call("allocate", |response| StoreRequest::Allocate { response })
            .await?
            .ok_or(Error::IdsExhausted)
    }

    /// Records a completed job and waits until it is visible to lookups.
    pub async fn record(&self, entry: JobEntry) -> Result<()> {
        self.call("record", |response| StoreRequest::Record { entry, response })
            .await
    }

    /// Returns the hex digest for `id`, or `None` if it is pending or was
    /// never allocated.
    pub async fn lookup(&self, id: JobId) -> Result<Option<String>> {
        self.call("lookup", |response| StoreRequest::Lookup { id, response })
            .await
    }

    /// Returns a consistent snapshot of the statistics.
    pub async fn stats(&self) -> Result<Stats> {
        self.call("stats", |response| StoreRequest::Stats { response })
            .await
    }

    async fn call<T>(
        &self,
        op: &'static str,
        request: impl FnOnce(oneshot::Sender<T>) -> StoreRequest,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();

        if self.tx.send(request(tx)).await.is_err() {
            return Err(Error::ChannelError {
                context: format!("Job store closed before {op}"),
            });
        }

        rx.await.map_err(|_| Error::ChannelError {
            context: format!("Job store dropped {op} response"),
        })
    }
}
