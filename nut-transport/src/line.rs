//! Newline framing over a raw byte stream
//!
//! The NUT protocol is ASCII lines terminated by `\n`. [`LineStream`] buffers
//! whatever the socket hands back and splits it into lines, so callers never
//! see partial reads.

use crate::error::{NutError, NutResult};
use crate::stream::StreamAccessor;
use async_trait::async_trait;
use bytes::BytesMut;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Default upper bound for a single reply line
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

const READ_CHUNK: usize = 1024;

/// Line-buffered stream with a per-I/O timeout
pub struct LineStream<S> {
    stream: S,
    buffer: BytesMut,
    timeout: Option<Duration>,
    max_line_length: usize,
    closed: bool,
}

impl<S> LineStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    /// Wrap an already-connected stream
    pub fn new(stream: S, timeout: Option<Duration>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            timeout,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            closed: false,
        }
    }

    /// Set the longest line accepted before a terminator must appear
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Number of bytes received but not yet returned as a line
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    async fn fill_buffer(&mut self) -> NutResult<usize> {
        self.buffer.reserve(READ_CHUNK);
        let timeout = self.timeout;
        let read = self.stream.read_buf(&mut self.buffer);

        let result = match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, read).await {
                Ok(read) => read.map_err(NutError::Connection),
                Err(_) => Err(NutError::Timeout(format!(
                    "no data received within {:?}",
                    timeout
                ))),
            },
            None => read.await.map_err(NutError::Connection),
        };

        if result.is_err() {
            self.closed = true;
        }
        result
    }
}

#[async_trait]
impl<S> StreamAccessor for LineStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> NutResult<()> {
        self.timeout = timeout;
        Ok(())
    }

    async fn read_line(&mut self) -> NutResult<Vec<u8>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                return Ok(self.buffer.split_to(pos + 1).to_vec());
            }

            if self.buffer.len() >= self.max_line_length {
                return Err(NutError::InvalidData(format!(
                    "line exceeds {} bytes without a terminator",
                    self.max_line_length
                )));
            }

            if self.closed {
                return Ok(self.buffer.split().to_vec());
            }

            if self.fill_buffer().await? == 0 {
                self.closed = true;
            }
        }
    }

    async fn write_all(&mut self, buf: &[u8]) -> NutResult<()> {
        if self.closed {
            return Err(NutError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Stream is closed",
            )));
        }

        let result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.stream.write_all(buf))
                .await
                .map_err(|_| {
                    NutError::Timeout(format!("write not completed within {:?}", timeout))
                })?
                .map_err(NutError::Connection),
            None => self.stream.write_all(buf).await.map_err(NutError::Connection),
        };

        if result.is_err() {
            self.closed = true;
        }
        result
    }

    async fn flush(&mut self) -> NutResult<()> {
        self.stream.flush().await.map_err(NutError::Connection)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> NutResult<()> {
        let _ = self.stream.shutdown().await;
        self.buffer.clear();
        self.closed = true;
        Ok(())
    }
}

impl<S> fmt::Debug for LineStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineStream")
            .field("buffered", &self.buffer.len())
            .field("timeout", &self.timeout)
            .field("max_line_length", &self.max_line_length)
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_read_line_across_chunks() {
        let (client, mut server) = duplex(64);
        let mut stream = LineStream::new(client, Some(Duration::from_secs(1)));

        server.write_all(b"BEGIN LIST").await.unwrap();
        server.write_all(b" UPS\nUPS test").await.unwrap();
        server.write_all(b" \"bob\"\n").await.unwrap();

        assert_eq!(assert_ok!(stream.read_line().await), b"BEGIN LIST UPS\n");
        assert_eq!(assert_ok!(stream.read_line().await), b"UPS test \"bob\"\n");
        assert_eq!(stream.buffered(), 0);
    }

    #[tokio::test]
    async fn test_read_line_eof() {
        let (client, mut server) = duplex(64);
        let mut stream = LineStream::new(client, Some(Duration::from_secs(1)));

        server.write_all(b"OK\npartial").await.unwrap();
        drop(server);

        assert_eq!(assert_ok!(stream.read_line().await), b"OK\n");
        assert_eq!(assert_ok!(stream.read_line().await), b"partial");
        assert!(assert_ok!(stream.read_line().await).is_empty());
        assert!(stream.is_closed());
    }

    #[tokio::test]
    async fn test_read_line_timeout() {
        let (client, _server) = duplex(64);
        let mut stream = LineStream::new(client, Some(Duration::from_millis(20)));

        let err = assert_err!(stream.read_line().await);
        assert!(matches!(err, NutError::Timeout(_)));
        assert!(stream.is_closed());
    }

    #[tokio::test]
    async fn test_read_line_too_long() {
        let (client, mut server) = duplex(256);
        let mut stream =
            LineStream::new(client, Some(Duration::from_secs(1))).with_max_line_length(16);

        server.write_all(&[b'x'; 32]).await.unwrap();

        let err = assert_err!(stream.read_line().await);
        assert!(matches!(err, NutError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_write_after_close() {
        let (client, mut server) = duplex(64);
        let mut stream = LineStream::new(client, None);

        assert_ok!(stream.write_all(b"LIST UPS\n").await);
        assert_ok!(stream.flush().await);
        let mut received = [0u8; 9];
        server.read_exact(&mut received).await.unwrap();
        assert_eq!(&received, b"LIST UPS\n");

        assert_ok!(stream.close().await);
        assert_ok!(stream.close().await);
        assert_err!(stream.write_all(b"LIST UPS\n").await);
    }
}
