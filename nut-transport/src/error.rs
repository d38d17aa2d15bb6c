//! Error types for the transport layer

pub use nut_core::error::{NutError, NutResult};
