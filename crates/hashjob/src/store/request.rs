//! Internal message types sent to the job store task.
//!
//! This module defines [`StoreRequest`], the command protocol between
//! [`JobStore`](super::JobStore) handles and the single task that owns the
//! [`JobTable`](super::JobTable). Every variant carries its own one-shot reply
//! channel, so callers never share a response path.
//!
//! ## Variants
//!
//! - [`Allocate`]: Hand out the next job ID.
//! - [`Record`]: Store a completed entry; acknowledged once applied.
//! - [`Lookup`]: Fetch the hex digest of a completed job.
//! - [`Stats`]: Snapshot the running statistics.
//!
//! [`Allocate`]: StoreRequest::Allocate
//! [`Record`]: StoreRequest::Record
//! [`Lookup`]: StoreRequest::Lookup
//! [`Stats`]: StoreRequest::Stats

use crate::types::{JobEntry, JobId, Stats};
use tokio::sync::oneshot;

/// A message sent from a [`JobStore`](super::JobStore) handle to the store
/// task.
#[derive(Debug)]
pub(crate) enum StoreRequest {
    /// Allocate the next job ID; `None` if the sequence is exhausted.
    Allocate {
        response: oneshot::Sender<Option<JobId>>,
    },

    /// Record a completed job.
    ///
    /// - `entry`: The finished job.
    /// - `response`: Fired after the entry (and statistics) are applied.
    Record {
        entry: JobEntry,
        response: oneshot::Sender<()>,
    },

    /// Look up the digest of `id`; `None` if pending or unknown.
    Lookup {
        id: JobId,
        response: oneshot::Sender<Option<String>>,
    },

    /// Snapshot the statistics.
    Stats { response: oneshot::Sender<Stats> },
}
