//! Stream accessor trait for transport layer

use crate::error::NutResult;
use async_trait::async_trait;
use std::time::Duration;

/// Stream accessor interface to a line-oriented connection with a NUT server
#[async_trait]
pub trait StreamAccessor: Send + Sync {
    /// Set the per-I/O timeout
    ///
    /// # Arguments
    ///
    /// * `timeout` - The timeout duration. None means infinite timeout.
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> NutResult<()>;

    /// Read one line from the stream
    ///
    /// # Returns
    ///
    /// The line including its trailing `\n`. An empty vector means the peer
    /// closed the stream. A final fragment without `\n` is returned as-is.
    async fn read_line(&mut self) -> NutResult<Vec<u8>>;

    /// Write all data to the stream
    async fn write_all(&mut self, buf: &[u8]) -> NutResult<()>;

    /// Flush any buffered data
    async fn flush(&mut self) -> NutResult<()>;

    /// Check if the stream is closed
    fn is_closed(&self) -> bool;

    /// Close the stream
    ///
    /// Closing an already closed stream is a no-op.
    async fn close(&mut self) -> NutResult<()>;
}

/// Transport layer trait that extends StreamAccessor
#[async_trait]
pub trait TransportLayer: StreamAccessor {
    /// Open the physical layer connection
    async fn open(&mut self) -> NutResult<()>;
}
