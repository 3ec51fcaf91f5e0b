//! Server-side components of the `hashjob` HTTP service.
//!
//! ## Submodules
//!
//! - [`config`] - CLI/environment configuration.
//! - [`service`] - Routes, handlers, and HTTP error mapping.
//! - [`telemetry`] - Logging and optional metrics initialization.
//!
//! These components are wired together in the server's `main.rs`.

pub mod config;
pub mod service;
pub mod telemetry;
