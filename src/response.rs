//! Outgoing response state and the finalizer.
//!
//! Handlers record *what* to send on a [`Response`]: a status, a [`Body`],
//! headers. After the chain returns, the dispatcher calls
//! [`Response::finalize`] once to turn that into bytes on the
//! [`ResponseWriter`], unless a handler opted out with
//! [`Response::set_dont_respond`].

use std::fmt;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::error::Error;
use crate::writer::ResponseWriter;

// ── Body ──────────────────────────────────────────────────────────────────────

/// A value that can be encoded as JSON when the response is finalized.
///
/// Implemented for every `Serialize + Send + 'static` type; you never
/// implement it yourself. Encoding is deferred to finalize time, so a value
/// that fails to serialize fails the dispatch, not the handler that set it.
pub trait Structured: Send + 'static {
    fn to_json(&self) -> serde_json::Result<Vec<u8>>;
}

impl<T> Structured for T
where
    T: Serialize + Send + 'static,
{
    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// A response body.
///
/// | Variant | Written as | Implicit `content-type` |
/// |---|---|---|
/// | `Bytes` | verbatim | `application/octet-stream` |
/// | `Text` | its UTF-8 bytes | `text/plain; charset=utf-8` |
/// | `Json` | `serde_json` encoding | `application/json` |
pub enum Body {
    Bytes(Bytes),
    Text(String),
    Json(Box<dyn Structured>),
}

impl Body {
    /// Wraps any serializable value.
    pub fn json(value: impl Serialize + Send + 'static) -> Self {
        Self::Json(Box::new(value))
    }

    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static(match self {
            Self::Bytes(_) => "application/octet-stream",
            Self::Text(_) => "text/plain; charset=utf-8",
            Self::Json(_) => "application/json",
        })
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Json(_) => f.write_str("Json(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self { Self::Bytes(b) }
}

impl From<Vec<u8>> for Body {
    fn from(b: Vec<u8>) -> Self { Self::Bytes(b.into()) }
}

impl From<&'static [u8]> for Body {
    fn from(b: &'static [u8]) -> Self { Self::Bytes(Bytes::from_static(b)) }
}

impl From<String> for Body {
    fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

// ── Status resolution ─────────────────────────────────────────────────────────

/// Picks the status line for a response.
///
/// An explicit status always wins. Otherwise a response with a body is
/// `200 OK` and one without is `404 Not Found`: nothing in the chain produced
/// anything for this request.
pub fn resolve_status(explicit: Option<StatusCode>, has_body: bool) -> StatusCode {
    match (explicit, has_body) {
        (Some(status), _) => status,
        (None, true) => StatusCode::OK,
        (None, false) => StatusCode::NOT_FOUND,
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

/// The response being built by a chain of handlers.
///
/// ```rust
/// use vox::{Request, Response, StatusCode};
///
/// fn create_user(_req: &mut Request, res: &mut Response) {
///     res.set_status(StatusCode::CREATED);
///     res.json(vec!["alice"]);
/// }
/// ```
#[derive(Debug, Default)]
pub struct Response {
    status: Option<StatusCode>,
    body: Option<Body>,
    dont_respond: bool,
    writer: ResponseWriter,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status set by a handler, `None` if left implicit.
    pub fn status(&self) -> Option<StatusCode> { self.status }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// The status [`finalize`](Response::finalize) would write right now.
    pub fn resolved_status(&self) -> StatusCode {
        resolve_status(self.status, self.body.is_some())
    }

    pub fn body(&self) -> Option<&Body> { self.body.as_ref() }

    /// Replaces the body. Accepts bytes, `Vec<u8>`, `String` or `&str`.
    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = Some(body.into());
    }

    /// Replaces the body with a value to be encoded as JSON.
    pub fn json(&mut self, value: impl Serialize + Send + 'static) {
        self.body = Some(Body::json(value));
    }

    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// Headers sent with the response.
    pub fn headers(&self) -> &HeaderMap { self.writer.headers() }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { self.writer.headers_mut() }

    pub fn dont_respond(&self) -> bool { self.dont_respond }

    /// With `true`, the dispatcher skips [`finalize`](Response::finalize) and
    /// writes nothing: the handler answers through
    /// [`writer_mut`](Response::writer_mut) itself.
    pub fn set_dont_respond(&mut self, dont_respond: bool) {
        self.dont_respond = dont_respond;
    }

    pub fn writer(&self) -> &ResponseWriter { &self.writer }

    /// Direct access to the outgoing message.
    pub fn writer_mut(&mut self) -> &mut ResponseWriter { &mut self.writer }

    pub(crate) fn into_writer(self) -> ResponseWriter {
        self.writer
    }

    /// Writes the status line and body to the writer.
    ///
    /// The dispatcher calls this once per request after the chain returns.
    /// The status line is written before the body is encoded, so a
    /// [`Error::Serialize`] leaves a status with no body behind.
    pub fn finalize(&mut self) -> Result<(), Error> {
        let status = self.resolved_status();

        if let Some(body) = &self.body {
            if !self.writer.headers().contains_key(CONTENT_TYPE) {
                let content_type = body.content_type();
                self.writer.headers_mut().insert(CONTENT_TYPE, content_type);
            }
        }

        self.writer.write_header(status);

        match self.body.take() {
            None => {}
            Some(Body::Bytes(bytes)) => self.writer.write(&bytes),
            Some(Body::Text(text)) => self.writer.write(text.as_bytes()),
            Some(Body::Json(value)) => {
                let bytes = value.to_json()?;
                self.writer.write(&bytes);
            }
        }
        Ok(())
    }
}
