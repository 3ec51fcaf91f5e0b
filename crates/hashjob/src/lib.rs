//! # `hashjob`: Deferred Password Hashing Jobs
//!
//! `hashjob` accepts secrets for hashing, hands back a job ID straight away,
//! and computes the SHA-512 digest in the background after a configurable
//! delay. Digests can later be fetched by ID, and aggregate statistics (number
//! of completed jobs, average hashing time) are kept as jobs complete.
//!
//! ## Highlights
//!
//! - **Single-owner job state**: ID allocation, the digest table, and the
//!   statistics all live in one Tokio task and are reached only through
//!   messages, so every operation is atomic with respect to every other.
//! - **Fire-and-forget workers**: one task per submission; the submitter never
//!   waits on the hash.
//! - **Graceful drain**: once shutdown starts, new submissions are refused and
//!   every accepted job is allowed to finish.
//!
//! ## Example
//!
//! ```no_run
//! use core::time::Duration;
//! use hashjob::{CoordinatorConfig, HashCoordinator};
//!
//! # async fn demo() -> hashjob::Result<()> {
//! let coordinator = HashCoordinator::new(CoordinatorConfig {
//!     hash_wait: Duration::from_secs(5),
//!     ..CoordinatorConfig::default()
//! });
//!
//! let id = coordinator.submit("angryMonkey").await?;
//! assert_eq!(coordinator.lookup(id).await?, None); // still pending
//!
//! coordinator.shutdown().await; // waits for the job above
//! assert!(coordinator.lookup(id).await?.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`store`] - The job-state actor.
//! - [`digest`] - The digest worker and wire encoding.
//! - [`coordinator`] - Submission/completion coordination.
//! - [`shutdown`] - Accepting/draining state and outstanding-worker tracking.

pub mod coordinator;
pub mod digest;
mod error;
pub mod shutdown;
pub mod store;
mod types;

pub use crate::coordinator::{CoordinatorConfig, HashCoordinator};
pub use crate::error::*;
pub use crate::shutdown::{Phase, ShutdownCoordinator, WorkerGuard};
pub use crate::store::JobStore;
pub use crate::types::*;
