//! Rust client for the NUT (Network UPS Tools) network protocol
//!
//! This library polls and controls UPS devices exposed by a NUT server
//! (`upsd`) over its line-oriented TCP protocol.
//!
//! # Architecture
//!
//! The library is organized as a workspace with multiple crates:
//!
//! - `nut-core`: Error taxonomy and command model
//! - `nut-transport`: Line-oriented TCP transport
//! - `nut-protocol`: Command encoding and reply decoding
//! - `nut-client`: Client session, retry policy, configuration
//!
//! # Usage
//!
//! ```no_run
//! use nut::NutClient;
//!
//! # async fn run() -> nut::NutResult<()> {
//! let client = NutClient::builder()
//!     .host("192.168.1.20")
//!     .credentials("monuser", "secret")
//!     .build()?;
//! let vars = client.list_vars("myups").await?;
//! println!("status: {:?}", vars.get("ups.status"));
//! client.run_command("myups", "beeper.disable", None).await?;
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use nut_core::{Command, Disposition, ErrorKind, NutError, NutResult, Verb};

// Re-export client API
pub use nut_client::{
    ClientBuilder, ClientConfig, LogObserver, NutClient, SessionEvent, SessionObserver, SessionState,
};

pub mod client {
    pub use nut_client::*;
}

pub mod protocol {
    pub use nut_protocol::*;
}

pub mod transport {
    pub use nut_transport::*;
}
