//! Unified error type.

use std::fmt;

/// The error type returned by vox's fallible operations.
///
/// Application-level outcomes (404, 422, etc.) are expressed on the
/// [`Response`](crate::Response), not as `Error`s. This type surfaces
/// infrastructure failures and the one failure that aborts a dispatch: a
/// structured body that cannot be serialized.
#[derive(Debug)]
pub enum Error {
    /// Binding, accepting or writing to a socket failed.
    Io(std::io::Error),
    /// The request body could not be read from the transport.
    Body(Box<dyn std::error::Error + Send + Sync>),
    /// A structured response body could not be encoded as JSON.
    Serialize(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Body(e) => write!(f, "request body: {e}"),
            Self::Serialize(e) => write!(f, "response body serialization: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Body(e) => Some(e.as_ref()),
            Self::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}
