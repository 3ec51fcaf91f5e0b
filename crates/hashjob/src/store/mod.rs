//! The job-state actor.
//!
//! All job state (the ID counter, the table of completed digests, and the
//! running statistics) lives in a single [`JobTable`] owned by one Tokio task.
//! Everything else talks to it through a cloneable [`JobStore`] handle that
//! sends [`request`] messages over a bounded MPSC queue and awaits a one-shot
//! reply.
//!
//! ## Submodules
//!
//! - [`table`] - The synchronous state machine.
//! - [`actor`] - The owning task and its handle.
//! - [`request`] - The internal message protocol.

mod actor;
mod request;
mod table;

pub use actor::JobStore;
pub use table::{JobTable, Recorded};

#[cfg(test)]
mod tests;
