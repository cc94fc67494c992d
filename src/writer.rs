//! Outgoing message writer.
//!
//! Everything a dispatch sends goes through a [`ResponseWriter`]: the
//! finalizer on the normal path, or a handler directly once it has taken over
//! with [`Response::set_dont_respond`](crate::Response::set_dont_respond).
//! Writes are buffered and handed to hyper as one message when the dispatch
//! returns.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tracing::warn;

/// Buffered status, headers and body of the outgoing message.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }

    /// Status written so far, `None` until the first write.
    pub fn status(&self) -> Option<StatusCode> { self.status }

    /// Body bytes written so far.
    pub fn body(&self) -> &[u8] { &self.body }

    /// `true` once a status line has been written.
    pub fn is_written(&self) -> bool {
        self.status.is_some()
    }

    /// Writes the status line. Only the first call takes effect.
    pub fn write_header(&mut self, status: StatusCode) {
        if let Some(written) = self.status {
            warn!(%written, ignored = %status, "superfluous write_header call");
            return;
        }
        self.status = Some(status);
    }

    /// Appends to the body, writing a `200 OK` status line first if none was
    /// written yet.
    pub fn write(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes);
    }

    /// Converts what was written into the message hyper sends. A writer that
    /// was never written to becomes an empty `200 OK`.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}
