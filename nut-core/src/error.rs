use thiserror::Error;

/// Main error type for NUT client operations
#[derive(Error, Debug)]
pub enum NutError {
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    #[error("Client has been shut down")]
    Shutdown,

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for NUT client operations
pub type NutResult<T> = Result<T, NutError>;

/// Closed set of error kinds, one per [`NutError`] variant
///
/// Lets callers branch on the failure class without matching on payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or unexpected reply shape
    Protocol,
    /// Credential rejection, at handshake time or on a later command
    Login,
    /// The server rejected a specific command
    Command,
    /// The peer closed the stream
    ConnectionClosed,
    /// Operation attempted after terminal shutdown
    Shutdown,
    /// An I/O step exceeded the session timeout
    Timeout,
    /// Transport-level (OS) failure
    Os,
    /// Malformed input or undecodable data
    Value,
}

/// What the operation executor does with a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Transient fault: reconnect and try again if attempts remain
    Retry,
    /// Deterministic condition: surface immediately
    FailFast,
}

impl NutError {
    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NutError::Protocol(_) => ErrorKind::Protocol,
            NutError::Login(_) => ErrorKind::Login,
            NutError::Command(_) => ErrorKind::Command,
            NutError::ConnectionClosed(_) => ErrorKind::ConnectionClosed,
            NutError::Shutdown => ErrorKind::Shutdown,
            NutError::Timeout(_) => ErrorKind::Timeout,
            NutError::Connection(_) => ErrorKind::Os,
            NutError::InvalidData(_) => ErrorKind::Value,
        }
    }

    /// Classify this error for the retry policy
    ///
    /// Peer-initiated close and low-level faults (timeout, OS error, malformed data)
    /// are retried; protocol shape violations, rejections and shutdown are not.
    pub fn disposition(&self) -> Disposition {
        match self.kind() {
            ErrorKind::ConnectionClosed | ErrorKind::Timeout | ErrorKind::Os | ErrorKind::Value => {
                Disposition::Retry
            }
            ErrorKind::Protocol | ErrorKind::Login | ErrorKind::Command | ErrorKind::Shutdown => {
                Disposition::FailFast
            }
        }
    }

    /// Check if this error should trigger a reconnect-and-retry
    pub fn is_retryable(&self) -> bool {
        self.disposition() == Disposition::Retry
    }
}
