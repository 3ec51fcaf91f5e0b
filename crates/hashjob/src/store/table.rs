use crate::types::{JobEntry, JobId, Stats};
use std::collections::HashMap;

/// Outcome of recording a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// The entry was stored and the statistics updated.
    Inserted,
    /// An entry for this ID already existed; nothing was changed.
    Duplicate,
}

/// All mutable job state: the ID counter, completed entries, and statistics.
///
/// `JobTable` is a plain synchronous state machine. It is owned by exactly one
/// task (see [`store_loop`](super::actor::store_loop)), which is what makes
/// each operation atomic with respect to every other.
#[derive(Debug)]
pub struct JobTable {
    /// `None` once the ID after `JobId::MAX` would be needed.
    next_id: Option<JobId>,
    entries: HashMap<JobId, JobEntry>,
    stats: Stats,
}

impl JobTable {
    /// Creates an empty table whose first allocated ID is `first_id`.
    pub fn new(first_id: JobId) -> Self {
        Self {
            next_id: Some(first_id),
            entries: HashMap::new(),
            stats: Stats::default(),
        }
    }

    /// Returns the next unused ID and advances the counter, or `None` once
    /// `JobId::MAX` has been handed out.
    pub fn allocate(&mut self) -> Option<JobId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        Some(id)
    }

    /// Stores a completed entry and folds its duration into the statistics.
    ///
    /// A second completion for the same ID is ignored so the first entry and
    /// the statistics stay consistent with each other.
    pub fn record(&mut self, entry: JobEntry) -> Recorded {
        if self.entries.contains_key(&entry.id) {
            return Recorded::Duplicate;
        }

        self.stats.record(entry.duration_micros);
        self.entries.insert(entry.id, entry);
        Recorded::Inserted
    }

    /// Returns the hex digest for `id`, if that job has completed.
    pub fn lookup(&self, id: JobId) -> Option<&str> {
        self.entries.get(&id).map(|entry| entry.digest.as_str())
    }

    /// Returns a copy of the current statistics.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no job has completed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
