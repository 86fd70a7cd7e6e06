//! Error types for wayfire-ipc.

use thiserror::Error;

/// Main error type for all client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not connect to the compositor socket.
    #[error("failed to connect to compositor socket: {0}")]
    Connect(#[source] std::io::Error),

    /// I/O error while reading or writing an in-flight message.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The compositor closed the connection before a full message arrived.
    #[error("connection closed by compositor")]
    ConnectionClosed,

    /// Malformed frame or JSON payload.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The compositor rejected the request; carries its message verbatim.
    #[error("compositor error: {0}")]
    Remote(String),

    /// A caller-side precondition was violated; nothing was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Protocol(err.to_string())
    }
}

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;
