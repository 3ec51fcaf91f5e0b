//! HTTP service implementation.
//!
//! ## Structure
//!
//! - [`handler`] - Request handlers and shared [`AppState`](handler::AppState).
//! - [`router`] - Route table and middleware, including the draining gate.
//! - [`error`] - Mapping of failures to HTTP status codes.

pub mod error;
pub mod handler;
pub mod router;
