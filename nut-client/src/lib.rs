//! NUT (Network UPS Tools) client implementation
//!
//! This crate provides the client session: connection management with
//! optional login, single-flight execution of operations, and the retry
//! policy for transient network failures.
//!
//! ```rust,no_run
//! use nut_client::NutClient;
//!
//! # async fn run() -> nut_core::NutResult<()> {
//! let client = NutClient::builder().host("127.0.0.1").build()?;
//! for (ups, description) in client.list_ups().await? {
//!     println!("{}: {}", ups, description);
//! }
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection;
mod executor;
pub mod observer;
mod operation;

pub use builder::ClientBuilder;
pub use client::NutClient;
pub use config::ClientConfig;
pub use connection::SessionState;
pub use executor::MAX_ATTEMPTS;
pub use observer::{LogObserver, SessionEvent, SessionObserver};
