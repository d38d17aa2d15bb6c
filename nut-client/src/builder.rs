//! Client builder
//!
//! ```rust,no_run
//! use nut_client::ClientBuilder;
//! use std::time::Duration;
//!
//! # async fn run() -> nut_core::NutResult<()> {
//! let client = ClientBuilder::new()
//!     .host("192.168.1.20")
//!     .credentials("monuser", "secret")
//!     .timeout(Duration::from_secs(2))
//!     .build()?;
//! let upses = client.list_ups().await?;
//! # Ok(())
//! # }
//! ```

use crate::client::NutClient;
use crate::config::ClientConfig;
use crate::observer::{LogObserver, SessionObserver};
use nut_core::NutResult;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`NutClient`]
///
/// Starts from [`ClientConfig::default`]; `build()` validates the result.
#[derive(Clone)]
pub struct ClientBuilder {
    config: ClientConfig,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            observer: None,
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Server host name or address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Server port (default 3493)
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Username sent with `USERNAME` on connect
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    /// Password sent with `PASSWORD` on connect
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Username and password together
    pub fn credentials(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username(username).password(password)
    }

    /// Bound on each I/O step
    ///
    /// Rounded down to whole milliseconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Keep the connection open between operations (default true)
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.config.persistent = persistent;
        self
    }

    /// Longest accepted reply line
    pub fn max_line_length(mut self, max_line_length: usize) -> Self {
        self.config.max_line_length = max_line_length;
        self
    }

    /// Largest accepted list reply
    pub fn max_list_bytes(mut self, max_list_bytes: usize) -> Self {
        self.config.max_list_bytes = max_list_bytes;
        self
    }

    /// Receiver for session events, instead of the `log` facade
    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the client
    ///
    /// # Errors
    /// Returns `InvalidData` if the configuration does not validate.
    pub fn build(self) -> NutResult<NutClient> {
        let observer = self.observer.unwrap_or_else(|| Arc::new(LogObserver));
        NutClient::with_observer(self.config, observer)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
