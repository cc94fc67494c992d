//! Handler composition.
//!
//! A [`Chain`] runs its handlers in registration order. Instead of building a
//! nest of closures per request, the request carries a cursor into the
//! shared, immutable handler list:
//!
//! ```text
//! chain = [h0, h1, h2]        cursor.at
//! chain.call(req, res)        0
//!   req.next(res) → h0        1   ← h0 sees "the rest" as h1..
//!     req.next(res) → h1      2
//!       req.next(res) → h2    3
//!         req.next(res)       3   ← past the end: terminal no-op
//! ```
//!
//! After a handler returns, the cursor is put back where it was before the
//! handler ran. A handler that calls `next` twice therefore runs the rest of
//! the chain twice. Nothing guards against it.

use std::sync::Arc;

use tracing::trace;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// A request's position within the chain currently executing.
///
/// `outer` is the position in the enclosing chain when a [`Chain`] runs as a
/// handler inside another one; reaching the end of the inner chain resumes it.
pub(crate) struct Cursor {
    chain: Arc<[BoxedHandler]>,
    at: usize,
    outer: Option<Box<Cursor>>,
}

impl Cursor {
    fn new(chain: Arc<[BoxedHandler]>) -> Self {
        Self { chain, at: 0, outer: None }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(Arc::from(Vec::new()))
    }
}

/// An ordered list of handlers composed into a single [`Handler`].
///
/// Cloning is cheap: clones share the same handler list.
#[derive(Clone)]
pub struct Chain {
    handlers: Arc<[BoxedHandler]>,
}

impl Chain {
    /// Number of handlers in the chain.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain").field("len", &self.handlers.len()).finish()
    }
}

/// Composes `handlers` into one handler that runs them in the given order.
///
/// Each handler decides whether the rest runs by calling
/// [`Request::next`]. An empty list composes to a no-op.
///
/// ```rust
/// use std::sync::Arc;
/// use vox::{compose, BoxedHandler, Handler, Request, Response};
///
/// fn first(req: &mut Request, res: &mut Response) {
///     res.set_body("first");
///     req.next(res);
/// }
///
/// fn second(_req: &mut Request, res: &mut Response) {
///     res.set_body("second");
/// }
///
/// let handlers: Vec<BoxedHandler> = vec![Arc::new(first), Arc::new(second)];
/// let chain = compose(handlers);
///
/// let mut req = Request::new(vox::http::Request::new(Default::default()));
/// let mut res = Response::new();
/// chain.call(&mut req, &mut res);
/// assert!(matches!(res.body(), Some(vox::Body::Text(s)) if s == "second"));
/// ```
pub fn compose(handlers: impl IntoIterator<Item = BoxedHandler>) -> Chain {
    Chain { handlers: handlers.into_iter().collect() }
}

impl Handler for Chain {
    fn call(&self, req: &mut Request, res: &mut Response) {
        let outer = std::mem::replace(&mut req.cursor, Cursor::new(Arc::clone(&self.handlers)));
        req.cursor.outer = Some(Box::new(outer));

        advance(req, res);

        if let Some(outer) = req.cursor.outer.take() {
            req.cursor = *outer;
        }
    }
}

/// Runs the handler under the cursor, or resumes the enclosing chain once
/// this one is exhausted.
pub(crate) fn advance(req: &mut Request, res: &mut Response) {
    let chain = Arc::clone(&req.cursor.chain);
    let at = req.cursor.at;

    match chain.get(at) {
        Some(handler) => {
            trace!(index = at, "entering handler");
            req.cursor.at = at + 1;
            handler.call(req, res);
            req.cursor.at = at;
        }
        None => {
            let Some(outer) = req.cursor.outer.take() else {
                return;
            };
            let inner = std::mem::replace(&mut req.cursor, *outer);
            advance(req, res);
            let outer = std::mem::replace(&mut req.cursor, inner);
            req.cursor.outer = Some(Box::new(outer));
        }
    }
}
