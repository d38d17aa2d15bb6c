//! Transport layer module for the NUT network protocol
//!
//! This crate provides the line-oriented byte-stream transport used by the
//! client: a [`StreamAccessor`] trait, newline framing over any tokio stream,
//! and a TCP implementation.

pub mod error;
pub mod line;
pub mod stream;
pub mod tcp;

pub use error::{NutError, NutResult};
pub use line::{LineStream, DEFAULT_MAX_LINE_LENGTH};
pub use stream::{StreamAccessor, TransportLayer};
pub use tcp::{TcpSettings, TcpTransport, DEFAULT_PORT};
