//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! The application holds handlers of *different* types in one ordered list.
//! Rust collections can only hold one concrete type, so every handler is put
//! behind a trait object (`dyn Handler`) and shared through an `Arc`:
//!
//! ```text
//! fn logger(req: &mut Request, res: &mut Response) { … }   ← user writes this
//!        ↓ app.with(logger)
//! Arc::new(logger) as BoxedHandler                          ← one allocation at setup
//!        ↓ compose(...)
//! handler.call(req, res)  at request time                   ← one vtable dispatch
//! ```
//!
//! Handlers are synchronous. A dispatch runs the whole chain to completion
//! before the response is finalized; there is no suspension point inside it.

use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

/// A unit of request-processing logic.
///
/// Implemented automatically for every function or closure with the signature
///
/// ```text
/// fn name(req: &mut Request, res: &mut Response)
/// ```
///
/// A handler inspects or mutates the pair, and either calls
/// [`Request::next`] to hand control to the following handler or returns
/// without calling it, which ends the chain.
///
/// Implement it on your own types when a middleware carries configuration:
///
/// ```rust
/// use vox::{Handler, Request, Response};
/// use vox::header::HeaderValue;
///
/// struct PoweredBy(&'static str);
///
/// impl Handler for PoweredBy {
///     fn call(&self, req: &mut Request, res: &mut Response) {
///         res.headers_mut().insert("x-powered-by", HeaderValue::from_static(self.0));
///         req.next(res);
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: &mut Request, res: &mut Response);
}

/// A type-erased handler shared across concurrent dispatches.
///
/// `Arc` gives cheap, thread-safe shared ownership: the chain is built once
/// and every connection task reads the same handlers.
pub type BoxedHandler = Arc<dyn Handler>;

impl<F> Handler for F
where
    F: Fn(&mut Request, &mut Response) + Send + Sync + 'static,
{
    fn call(&self, req: &mut Request, res: &mut Response) {
        self(req, res)
    }
}
