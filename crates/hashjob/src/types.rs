//! Common type definitions shared by the job store, coordinators, and the
//! HTTP front end.
//!
//! ## Type Aliases
//! - [`JobId`]: Signed so that any decimal integer a client sends parses; IDs
//!   the store hands out are always `>= FIRST_JOB_ID`.
//!
//! ## Constants
//! - [`FIRST_JOB_ID`]: Default base of the job ID sequence.

/// Identifier assigned to an accepted hashing job.
pub type JobId = i64;

/// First ID handed out by a freshly spawned store unless configured otherwise.
pub const FIRST_JOB_ID: JobId = 1;

/// A completed hashing job.
///
/// Entries are created exactly once, when the digest worker for `id` reports
/// back, and are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEntry {
    /// The job this digest belongs to.
    pub id: JobId,
    /// Lower-case hex encoding of the SHA-512 digest.
    pub digest: String,
    /// Wall time spent computing the digest, excluding the artificial delay.
    pub duration_micros: u64,
}

/// Point-in-time aggregate over all completed jobs.
///
/// `total` always equals the number of recorded entries. `average` is the
/// integer-truncated running mean of `duration_micros`, in microseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Number of completed jobs.
    pub total: u64,
    /// Running average digest duration in microseconds.
    pub average: u64,
}

impl Stats {
    /// Folds one more completion into the running statistics.
    ///
    /// Applies `average' = (average * (total - 1) + duration) / total` in that
    /// order with truncating division, so the result depends on the order in
    /// which completions arrive and may differ from `sum / count`.
    pub fn record(&mut self, duration_micros: u64) {
        self.total += 1;
        let total = u128::from(self.total);
        let weighted = u128::from(self.average) * (total - 1) + u128::from(duration_micros);
        // The mean of u64 samples always fits back into a u64.
        self.average = (weighted / total) as u64;
    }
}
