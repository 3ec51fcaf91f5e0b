//! Error types for the hashing job service.
//!
//! This module defines the central [`Error`] enum. The job store itself never
//! fails on its own terms; every variant here describes either a rejected
//! submission or an infrastructure fault around the store.
//!
//! ## Error Cases
//! - `ChannelError`: The job store task is gone and can no longer answer.
//! - `InvalidRequest`: The submission was malformed (e.g. an empty payload).
//! - `ServiceShutdown`: A submission arrived while the service was draining.
//! - `IdsExhausted`: Every job ID up to `JobId::MAX` has been handed out.

use thiserror::Error;

/// Unified error type for the hashing job service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Internal channel send/receive failure with the job store task.
    #[error("Channel communication error: {context}")]
    ChannelError { context: String },

    /// The submission was invalid.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The service is draining and no longer accepts new work.
    #[error("Service is shutting down")]
    ServiceShutdown,

    /// The job ID sequence has no IDs left.
    #[error("Job IDs exhausted")]
    IdsExhausted,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
