//! Incoming HTTP request type.

use std::sync::Arc;

use bytes::Bytes;
use http::{Extensions, HeaderMap, Method, Uri};

use crate::chain::{self, Cursor};
use crate::config::Config;
use crate::response::Response;

/// An incoming HTTP request, with its body already read in full.
///
/// Besides the message itself, a `Request` carries the continuation of the
/// chain it is travelling through: [`next`](Request::next) hands control to
/// the following handler.
pub struct Request {
    inner: http::Request<Bytes>,
    pub(crate) config: Arc<Config>,
    pub(crate) cursor: Cursor,
}

impl Request {
    /// Wraps a transport message. The request starts outside any chain, so
    /// [`next`](Request::next) is a no-op until a [`Chain`](crate::Chain)
    /// runs it.
    pub fn new(inner: http::Request<Bytes>) -> Self {
        Self { inner, config: Arc::default(), cursor: Cursor::default() }
    }

    pub(crate) fn with_config(inner: http::Request<Bytes>, config: Arc<Config>) -> Self {
        Self { inner, config, cursor: Cursor::default() }
    }

    pub fn method(&self) -> &Method { self.inner.method() }
    pub fn uri(&self) -> &Uri { self.inner.uri() }
    pub fn path(&self) -> &str { self.inner.uri().path() }
    pub fn headers(&self) -> &HeaderMap { self.inner.headers() }
    pub fn body(&self) -> &Bytes { self.inner.body() }

    /// The underlying transport message.
    pub fn inner(&self) -> &http::Request<Bytes> { &self.inner }

    /// Case-insensitive header lookup. `None` if absent or not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Per-request values shared between handlers of one dispatch.
    pub fn extensions(&self) -> &Extensions { self.inner.extensions() }
    pub fn extensions_mut(&mut self) -> &mut Extensions { self.inner.extensions_mut() }

    /// Application configuration value for `key`, or `""` if it was never set.
    pub fn config(&self, key: &str) -> &str {
        self.config.get(key)
    }

    /// Runs the rest of the chain from the current handler's position.
    ///
    /// Returns once every later handler that was reached has returned. Not
    /// calling `next` stops the chain at the current handler; calling it twice
    /// runs the rest of the chain twice.
    pub fn next(&mut self, res: &mut Response) {
        chain::advance(self, res);
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", self.inner.method())
            .field("uri", self.inner.uri())
            .finish_non_exhaustive()
    }
}
