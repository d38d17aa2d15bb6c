//! NUT client session
//!
//! A [`NutClient`] holds one connection to a NUT server and runs one command
//! at a time over it. Share it through an `Arc`; concurrent callers are
//! serialized.
//!
//! # Failure handling
//!
//! - `ConnectionClosed`, `Timeout`, OS-level and invalid-data faults are
//!   retried once on a fresh connection (with a new login).
//! - `Protocol`, `Command` and `Login` errors are returned at once.
//! - `ERR ACCESS-DENIED` is reported as `Login` even when it answers a
//!   regular command rather than `USERNAME`/`PASSWORD`.
//! - After [`shutdown`](NutClient::shutdown) every operation returns
//!   `Shutdown` without connecting.

use crate::builder::ClientBuilder;
use crate::config::ClientConfig;
use crate::connection::SessionState;
use crate::executor::Executor;
use crate::observer::{LogObserver, SessionObserver};
use crate::operation::{Describe, ListCommands, ListUps, ListVars, RunCommand};
use nut_core::NutResult;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Client session for a NUT server
pub struct NutClient {
    config: ClientConfig,
    executor: Executor,
}

impl NutClient {
    /// Create a client that reports events to the `log` facade
    ///
    /// No connection is made until the first operation.
    ///
    /// # Errors
    /// Returns `InvalidData` if the configuration does not validate.
    pub fn new(config: ClientConfig) -> NutResult<Self> {
        Self::with_observer(config, Arc::new(LogObserver))
    }

    /// Create a client that reports events to `observer`
    pub fn with_observer(config: ClientConfig, observer: Arc<dyn SessionObserver>) -> NutResult<Self> {
        config.validate()?;
        Ok(Self {
            executor: Executor::new(config.clone(), observer),
            config,
        })
    }

    /// Create a builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Description of a UPS (`GET UPSDESC`)
    pub async fn description(&self, ups: &str) -> NutResult<String> {
        self.executor.execute(&Describe { ups }).await
    }

    /// UPS name -> description for every UPS the server knows (`LIST UPS`)
    pub async fn list_ups(&self) -> NutResult<HashMap<String, String>> {
        self.executor.execute(&ListUps).await
    }

    /// Variable name -> value for a UPS (`LIST VAR`)
    pub async fn list_vars(&self, ups: &str) -> NutResult<HashMap<String, String>> {
        self.executor.execute(&ListVars { ups }).await
    }

    /// Instant commands a UPS supports (`LIST CMD`)
    pub async fn list_commands(&self, ups: &str) -> NutResult<HashSet<String>> {
        self.executor.execute(&ListCommands { ups }).await
    }

    /// Run an instant command (`INSTCMD`)
    ///
    /// # Returns
    /// The server's reply, normally `OK`
    ///
    /// # Errors
    /// Returns `Command` if the server answers with `ERR`.
    pub async fn run_command(&self, ups: &str, command: &str, param: Option<&str>) -> NutResult<String> {
        self.executor
            .execute(&RunCommand {
                ups,
                command,
                param,
            })
            .await
    }

    /// Close the connection if open
    ///
    /// The next operation reconnects. Waits for an in-flight operation.
    pub async fn disconnect(&self) {
        self.executor.disconnect().await;
    }

    /// Permanently retire the client
    pub async fn shutdown(&self) {
        self.executor.shutdown().await;
    }

    /// Whether [`shutdown`](Self::shutdown) has been called
    pub fn is_shutdown(&self) -> bool {
        self.executor.is_shut_down()
    }

    /// Current lifecycle state
    ///
    /// Waits for an in-flight operation.
    pub async fn state(&self) -> SessionState {
        self.executor.state().await
    }
}

impl Default for NutClient {
    fn default() -> Self {
        Self {
            config: ClientConfig::default(),
            executor: Executor::new(ClientConfig::default(), Arc::new(LogObserver)),
        }
    }
}

impl fmt::Debug for NutClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NutClient")
            .field("config", &self.config)
            .field("shut_down", &self.is_shutdown())
            .finish()
    }
}
