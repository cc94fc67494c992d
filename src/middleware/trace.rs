//! Per-request tracing.

use std::time::Instant;

use tracing::{info, info_span};

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

/// Wraps the rest of the chain in a `request` span and logs the outcome.
///
/// Register it first so the span covers every later handler:
///
/// ```rust
/// let app = vox::Application::new().with(vox::middleware::trace());
/// ```
pub fn trace() -> Trace {
    Trace
}

/// See [`trace`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Handler for Trace {
    fn call(&self, req: &mut Request, res: &mut Response) {
        let span = info_span!("request", method = %req.method(), path = req.path());
        let _entered = span.enter();
        let started = Instant::now();

        req.next(res);

        if res.dont_respond() {
            info!(latency_us = started.elapsed().as_micros() as u64, "handled, response left to handler");
        } else {
            info!(
                status = res.resolved_status().as_u16(),
                latency_us = started.elapsed().as_micros() as u64,
                "handled"
            );
        }
    }
}
