//! Built-in middleware.
//!
//! Middleware is any [`Handler`](crate::Handler) that calls
//! [`Request::next`](crate::Request::next) and does something around it.
//! This is the place for cross-cutting concerns such as structured tracing,
//! request-id injection and authentication-header inspection.
//!
//! - [`trace`]: per-request span with method, path, status, latency

mod trace;

pub use trace::{Trace, trace};
