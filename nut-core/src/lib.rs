//! Core types for the NUT (Network UPS Tools) network protocol client
//!
//! This crate provides the error taxonomy shared by every layer and the
//! command model used to build protocol requests.

pub mod command;
pub mod error;

pub use command::{Command, Verb, REDACTED};
pub use error::{Disposition, ErrorKind, NutError, NutResult};
