//! Connection management for the NUT client
//!
//! The connection manager owns the transport and the session lifecycle:
//!
//! ```text
//! Disconnected -> Connecting -> (Authenticating) -> Ready
//! Ready -> Disconnected            (disconnect)
//! any   -> ShutDown                (shutdown, terminal)
//! ```
//!
//! It is only ever driven by the operation executor while the operation lock
//! is held, so nothing else touches socket state.

use crate::config::ClientConfig;
use crate::observer::{SessionEvent, SessionObserver};
use nut_core::{Command, NutError, NutResult};
use nut_protocol::requests;
use nut_transport::{TcpTransport, TransportLayer};
use std::fmt;
use std::sync::Arc;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection (initial state)
    Disconnected,
    /// Transport is being opened
    Connecting,
    /// Transport is open, login exchange in progress
    Authenticating,
    /// Connected and logged in, ready for commands
    Ready,
    /// Permanently retired
    ShutDown,
}

impl SessionState {
    /// Check if the session is ready for operations
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }

    /// Check if the session has been retired
    pub fn is_shut_down(&self) -> bool {
        matches!(self, SessionState::ShutDown)
    }
}

/// A live transport plus its login marker
///
/// `in_flight` is set while an exchange runs. If the operation future is
/// dropped halfway, the marker stays set and the connection must not carry
/// another command: its reply may still be unread on the socket.
pub(crate) struct Connection {
    transport: Box<dyn TransportLayer>,
    authenticated: bool,
    in_flight: bool,
}

impl Connection {
    fn new(transport: Box<dyn TransportLayer>) -> Self {
        Self {
            transport,
            authenticated: false,
            in_flight: false,
        }
    }

    pub(crate) fn begin_exchange(&mut self) {
        self.in_flight = true;
    }

    pub(crate) fn end_exchange(&mut self) {
        self.in_flight = false;
    }

    /// Whether an exchange was started and never finished
    pub(crate) fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Stream to run protocol exchanges on
    pub(crate) fn stream(&mut self) -> &mut dyn TransportLayer {
        self.transport.as_mut()
    }

    /// Whether a login exchange completed on this connection
    pub(crate) fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("closed", &self.transport.is_closed())
            .field("authenticated", &self.is_authenticated())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

/// Owner of the session's connection and lifecycle state
pub(crate) struct ConnectionManager {
    config: ClientConfig,
    state: SessionState,
    connection: Option<Connection>,
    observer: Arc<dyn SessionObserver>,
}

impl ConnectionManager {
    pub(crate) fn new(config: ClientConfig, observer: Arc<dyn SessionObserver>) -> Self {
        Self {
            config,
            state: SessionState::Disconnected,
            connection: None,
            observer,
        }
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    /// The live connection
    ///
    /// # Errors
    /// Returns a `NotConnected` connection error if [`connect`](Self::connect)
    /// has not succeeded since the last disconnect.
    pub(crate) fn connection_mut(&mut self) -> NutResult<&mut Connection> {
        self.connection.as_mut().ok_or_else(|| {
            NutError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Session is not connected",
            ))
        })
    }

    /// Open the transport and log in, unless already ready
    ///
    /// A connection left with an unfinished exchange is closed and replaced.
    ///
    /// # Errors
    /// - `Shutdown` if the session has been retired
    /// - `Timeout` / `Connection` if the transport cannot be opened
    /// - `Login` if a `USERNAME` or `PASSWORD` step is rejected
    /// - `ConnectionClosed` if the server hangs up during login
    pub(crate) async fn connect(&mut self) -> NutResult<()> {
        match self.state {
            SessionState::ShutDown => return Err(NutError::Shutdown),
            SessionState::Ready
                if self.connection.as_ref().is_some_and(|c| !c.is_in_flight()) =>
            {
                return Ok(());
            }
            _ => {}
        }
        if self.connection.is_some() {
            log::debug!(target: "nut_client", "discarding connection with an unfinished exchange");
            self.disconnect().await;
        }

        let settings = self.config.tcp_settings();
        let address = settings.address();
        self.state = SessionState::Connecting;
        self.observer.on_event(&SessionEvent::Connecting { address: &address });

        let mut transport: Box<dyn TransportLayer> = Box::new(TcpTransport::new(settings));
        if let Err(e) = transport.open().await {
            self.state = SessionState::Disconnected;
            return Err(e);
        }
        self.observer.on_event(&SessionEvent::Connected { address: &address });

        let mut connection = Connection::new(transport);
        if let Err(e) = self.login(&mut connection).await {
            let _ = connection.transport.close().await;
            self.state = SessionState::Disconnected;
            self.observer.on_event(&SessionEvent::Disconnected);
            return Err(e);
        }

        self.connection = Some(connection);
        self.state = SessionState::Ready;
        Ok(())
    }

    async fn login(&mut self, connection: &mut Connection) -> NutResult<()> {
        let steps: Vec<Command> = [
            self.config.username.as_deref().map(Command::username),
            self.config.password.as_deref().map(Command::password),
        ]
        .into_iter()
        .flatten()
        .collect();

        if steps.is_empty() {
            return Ok(());
        }

        self.state = SessionState::Authenticating;
        for command in &steps {
            self.observer.on_event(&SessionEvent::CommandSent {
                command: &command.to_string(),
            });
            requests::login(connection.stream(), command).await?;
            self.observer.on_event(&SessionEvent::LoginAccepted { verb: command.verb() });
        }
        connection.authenticated = true;
        Ok(())
    }

    /// Close the transport if open and return to `Disconnected`
    ///
    /// Safe to call when already disconnected. A retired session stays
    /// `ShutDown`.
    pub(crate) async fn disconnect(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            if let Err(e) = connection.transport.close().await {
                log::debug!(target: "nut_client", "error while closing connection: {}", e);
            }
            self.observer.on_event(&SessionEvent::Disconnected);
        }
        if !self.state.is_shut_down() {
            self.state = SessionState::Disconnected;
        }
    }

    /// Disconnect and retire the session for good
    pub(crate) async fn shutdown(&mut self) {
        if self.state.is_shut_down() {
            return;
        }
        self.disconnect().await;
        self.state = SessionState::ShutDown;
        self.observer.on_event(&SessionEvent::ShutDown);
    }
}
