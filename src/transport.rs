//! Unix domain socket transport.
//!
//! Owns the connected stream and provides the exact-length read/write
//! primitives the protocol layer is built on. The transport knows nothing
//! about framing or JSON; it moves bytes.

use std::io;
use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use crate::error::{Error, Result};

/// A connected Unix domain socket to the compositor.
///
/// Once [`close`](Socket::close) has been called (or a transport failure has
/// occurred and the caller dropped to a closed state), every subsequent
/// operation fails with [`Error::ConnectionClosed`].
pub struct Socket {
    stream: Option<UnixStream>,
}

impl Socket {
    /// Connect to the compositor socket at `path`.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let stream = UnixStream::connect(path.as_ref())
            .await
            .map_err(Error::Connect)?;

        Ok(Self {
            stream: Some(stream),
        })
    }

    fn stream_mut(&mut self) -> Result<&mut UnixStream> {
        self.stream.as_mut().ok_or(Error::ConnectionClosed)
    }

    /// Fill `buf` completely, looping over partial reads.
    ///
    /// A peer close before `buf.len()` bytes have arrived is
    /// [`Error::ConnectionClosed`]; a short read never escapes this method.
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let stream = self.stream_mut()?;

        match stream.read_exact(buf).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::ConnectionClosed),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Write the full buffer, looping over partial writes.
    pub async fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream_mut()?;
        stream.write_all(bytes).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Shut down and release the socket. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
    }

    /// Whether [`close`](Socket::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_to_missing_path_fails() {
        let err = Socket::connect("/nonexistent/wayfire.sock")
            .await
            .err()
            .expect("connect must fail");
        assert!(matches!(err, Error::Connect(_)));
    }

    #[tokio::test]
    async fn operations_after_close_fail() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("wayfire-ipc-close-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let listener = tokio::net::UnixListener::bind(&path).unwrap();
        let accept = tokio::spawn(async move { listener.accept().await });

        let mut socket = Socket::connect(&path).await.unwrap();
        let _ = accept.await;

        socket.close().await;
        assert!(socket.is_closed());
        // Second close is a no-op.
        socket.close().await;

        let mut buf = [0u8; 4];
        assert!(matches!(
            socket.read_exact(&mut buf).await,
            Err(Error::ConnectionClosed)
        ));
        assert!(matches!(
            socket.write_all(b"x").await,
            Err(Error::ConnectionClosed)
        ));

        let _ = std::fs::remove_file(&path);
    }
}
