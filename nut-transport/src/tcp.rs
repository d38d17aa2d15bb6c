//! TCP transport implementation

use crate::error::{NutError, NutResult};
use crate::line::{LineStream, DEFAULT_MAX_LINE_LENGTH};
use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

/// Default port of the NUT network server
pub const DEFAULT_PORT: u16 = 3493;

/// TCP transport layer settings
#[derive(Debug, Clone)]
pub struct TcpSettings {
    pub host: String,
    pub port: u16,
    pub timeout: Option<Duration>,
    pub max_line_length: usize,
}

impl TcpSettings {
    /// Create new TCP settings
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: Some(Duration::from_secs(5)),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    /// Create TCP settings with timeout
    pub fn with_timeout(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::new(host, port)
        }
    }

    /// `host:port` form used for logging and connecting
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TCP transport layer implementation
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<LineStream<TcpStream>>,
    settings: TcpSettings,
    closed: bool,
}

impl TcpTransport {
    /// Create a new TCP transport layer
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            stream: None,
            settings,
            closed: true,
        }
    }

    /// Get the settings
    pub fn settings(&self) -> &TcpSettings {
        &self.settings
    }

    fn stream_mut(&mut self) -> NutResult<&mut LineStream<TcpStream>> {
        self.stream.as_mut().ok_or_else(|| {
            NutError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "TCP stream not connected",
            ))
        })
    }
}

#[async_trait]
impl TransportLayer for TcpTransport {
    async fn open(&mut self) -> NutResult<()> {
        if !self.closed {
            return Err(NutError::Connection(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        let address = (self.settings.host.as_str(), self.settings.port);
        let stream = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, TcpStream::connect(address))
                .await
                .map_err(|_| {
                    NutError::Timeout(format!(
                        "connect to {} not completed within {:?}",
                        self.settings.address(),
                        timeout
                    ))
                })?
                .map_err(NutError::Connection)?
        } else {
            TcpStream::connect(address)
                .await
                .map_err(NutError::Connection)?
        };
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!(target: "nut_transport", "failed to set TCP_NODELAY: {}", e);
        }

        self.stream = Some(
            LineStream::new(stream, self.settings.timeout)
                .with_max_line_length(self.settings.max_line_length),
        );
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl StreamAccessor for TcpTransport {
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> NutResult<()> {
        self.settings.timeout = timeout;
        if let Some(stream) = self.stream.as_mut() {
            stream.set_timeout(timeout).await?;
        }
        Ok(())
    }

    async fn read_line(&mut self) -> NutResult<Vec<u8>> {
        let result = self.stream_mut()?.read_line().await;
        match &result {
            Ok(line) if line.is_empty() => self.closed = true,
            Err(_) => self.closed = true,
            Ok(_) => {}
        }
        result
    }

    async fn write_all(&mut self, buf: &[u8]) -> NutResult<()> {
        let result = self.stream_mut()?.write_all(buf).await;
        if result.is_err() {
            self.closed = true;
        }
        result
    }

    async fn flush(&mut self) -> NutResult<()> {
        self.stream_mut()?.flush().await
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> NutResult<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.close().await?;
        }
        self.closed = true;
        Ok(())
    }
}
