//! Session event hook
//!
//! The client reports what it does through a [`SessionObserver`] handed to it
//! at construction. [`LogObserver`] forwards events to the `log` facade and is
//! used when no observer is configured.

use nut_core::{NutError, Verb};
use std::fmt;

/// Something the session did
///
/// Commands appear only in their redacted rendering.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    /// Opening the transport
    Connecting { address: &'a str },
    /// Transport open
    Connected { address: &'a str },
    /// A login step was accepted
    LoginAccepted { verb: Verb },
    /// Command written to the server (redacted)
    CommandSent { command: &'a str },
    /// An attempt failed and will be retried after reconnecting
    Retrying { attempt: usize, error: &'a NutError },
    /// An operation failed for good
    OperationFailed { operation: &'static str, error: &'a NutError },
    /// Transport closed
    Disconnected,
    /// Session retired
    ShutDown,
}

impl fmt::Display for SessionEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Connecting { address } => write!(f, "connecting to {}", address),
            SessionEvent::Connected { address } => write!(f, "connected to {}", address),
            SessionEvent::LoginAccepted { verb } => write!(f, "{} accepted", verb),
            SessionEvent::CommandSent { command } => write!(f, "sent {}", command),
            SessionEvent::Retrying { attempt, error } => {
                write!(f, "attempt {} failed, retrying: {}", attempt, error)
            }
            SessionEvent::OperationFailed { operation, error } => {
                write!(f, "{} failed: {}", operation, error)
            }
            SessionEvent::Disconnected => f.write_str("disconnected"),
            SessionEvent::ShutDown => f.write_str("shut down"),
        }
    }
}

/// Receiver of session events
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent<'_>);
}

/// Observer that writes events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_event(&self, event: &SessionEvent<'_>) {
        match event {
            SessionEvent::Retrying { .. } | SessionEvent::OperationFailed { .. } => {
                log::warn!(target: "nut_client", "{}", event)
            }
            _ => log::debug!(target: "nut_client", "{}", event),
        }
    }
}
