//! Operation executor
//!
//! Every public operation goes through [`Executor::execute`], which applies
//! one policy:
//!
//! 1. Fail with `Shutdown` if the session is retired, without touching the network.
//! 2. Take the operation lock, so one exchange at a time is on the wire.
//! 3. Up to [`MAX_ATTEMPTS`] times: connect (and log in) if needed, run the
//!    exchange, and on failure disconnect and either retry or give up
//!    according to [`NutError::disposition`].
//! 4. Disconnect afterwards unless the session is persistent.
//!
//! A caller may drop the future mid-exchange (e.g. under its own timeout).
//! The connection then stays marked in flight and the next operation
//! reconnects instead of reading the abandoned reply.

use crate::config::ClientConfig;
use crate::connection::{ConnectionManager, SessionState};
use crate::observer::{SessionEvent, SessionObserver};
use crate::operation::Operation;
use nut_core::{Disposition, NutError, NutResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Attempts per operation: the first try plus one retry
pub const MAX_ATTEMPTS: usize = 2;

/// Single-flight execution point for a session
pub(crate) struct Executor {
    manager: Mutex<ConnectionManager>,
    shut_down: AtomicBool,
    persistent: bool,
    observer: Arc<dyn SessionObserver>,
}

impl Executor {
    pub(crate) fn new(config: ClientConfig, observer: Arc<dyn SessionObserver>) -> Self {
        let persistent = config.persistent;
        Self {
            manager: Mutex::new(ConnectionManager::new(config, observer.clone())),
            shut_down: AtomicBool::new(false),
            persistent,
            observer,
        }
    }

    pub(crate) fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    pub(crate) async fn state(&self) -> SessionState {
        self.manager.lock().await.state()
    }

    pub(crate) async fn execute<O: Operation>(&self, operation: &O) -> NutResult<O::Output> {
        if self.is_shut_down() {
            return Err(NutError::Shutdown);
        }

        let mut manager = self.manager.lock().await;
        if manager.state().is_shut_down() {
            return Err(NutError::Shutdown);
        }

        let result = self.run_attempts(&mut manager, operation).await;

        if !self.persistent {
            manager.disconnect().await;
        }
        if let Err(error) = &result {
            self.observer.on_event(&SessionEvent::OperationFailed {
                operation: operation.name(),
                error,
            });
        }
        result
    }

    async fn run_attempts<O: Operation>(
        &self,
        manager: &mut ConnectionManager,
        operation: &O,
    ) -> NutResult<O::Output> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let error = match self.attempt(manager, operation).await {
                Ok(output) => return Ok(output),
                Err(error) => error,
            };

            manager.disconnect().await;
            match error.disposition() {
                Disposition::Retry if attempt < MAX_ATTEMPTS => {
                    self.observer.on_event(&SessionEvent::Retrying {
                        attempt,
                        error: &error,
                    });
                }
                _ => return Err(error),
            }
        }
    }

    async fn attempt<O: Operation>(
        &self,
        manager: &mut ConnectionManager,
        operation: &O,
    ) -> NutResult<O::Output> {
        manager.connect().await?;
        let limits = manager.config().list_limits();
        let connection = manager.connection_mut()?;
        self.observer.on_event(&SessionEvent::CommandSent {
            command: &operation.command().to_string(),
        });
        // left set if this future is dropped before the reply is read
        connection.begin_exchange();
        let result = operation.run(connection, limits).await;
        connection.end_exchange();
        result
    }

    pub(crate) async fn disconnect(&self) {
        self.manager.lock().await.disconnect().await;
    }

    /// Retire the session
    ///
    /// New operations fail at once; an operation already holding the lock
    /// finishes before the connection is closed.
    pub(crate) async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
        self.manager.lock().await.shutdown().await;
    }
}
