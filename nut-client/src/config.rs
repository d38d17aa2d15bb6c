//! Client configuration

use nut_core::{NutError, NutResult};
use nut_protocol::{ListLimits, DEFAULT_MAX_LIST_BYTES};
use nut_transport::{TcpSettings, DEFAULT_MAX_LINE_LENGTH, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Session configuration
///
/// Can be embedded in an application's own TOML/serde configuration; every
/// field has a default.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Bound on each I/O step, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Keep the connection open between operations
    #[serde(default = "default_persistent")]
    pub persistent: bool,
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    #[serde(default = "default_max_list_bytes")]
    pub max_list_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_persistent() -> bool {
    true
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

fn default_max_list_bytes() -> usize {
    DEFAULT_MAX_LIST_BYTES
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            timeout_ms: default_timeout_ms(),
            persistent: default_persistent(),
            max_line_length: default_max_line_length(),
            max_list_bytes: default_max_list_bytes(),
        }
    }
}

impl ClientConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> NutResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| NutError::InvalidData(format!("Invalid client configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the client cannot work with
    pub fn validate(&self) -> NutResult<()> {
        if self.host.trim().is_empty() {
            return Err(NutError::InvalidData("host must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(NutError::InvalidData("timeout must be greater than zero".to_string()));
        }
        if self.max_line_length == 0 || self.max_list_bytes == 0 {
            return Err(NutError::InvalidData(
                "line and list size limits must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-I/O timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub(crate) fn tcp_settings(&self) -> TcpSettings {
        TcpSettings {
            max_line_length: self.max_line_length,
            ..TcpSettings::with_timeout(self.host.clone(), self.port, self.timeout())
        }
    }

    pub(crate) fn list_limits(&self) -> ListLimits {
        ListLimits {
            timeout: Some(self.timeout()),
            max_bytes: self.max_list_bytes,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| nut_core::REDACTED))
            .field("timeout_ms", &self.timeout_ms)
            .field("persistent", &self.persistent)
            .field("max_line_length", &self.max_line_length)
            .field("max_list_bytes", &self.max_list_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3493);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.persistent);
        assert!(config.username.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_from_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
            host = "ups.local"
            username = "monuser"
            password = "secret"
            timeout_ms = 250
            persistent = false
            "#,
        )
        .unwrap();
        assert_eq!(config.host, "ups.local");
        assert_eq!(config.port, 3493);
        assert_eq!(config.username.as_deref(), Some("monuser"));
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert!(!config.persistent);
    }

    #[test]
    fn test_invalid() {
        assert!(ClientConfig::from_toml_str("timeout_ms = 0").is_err());
        assert!(ClientConfig::from_toml_str("host = \"\"").is_err());
        assert!(ClientConfig::from_toml_str("port = \"x\"").is_err());
    }

    #[test]
    fn test_debug_masks_password() {
        let config = ClientConfig {
            password: Some("hunter2".to_string()),
            ..ClientConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_tcp_settings() {
        let config = ClientConfig {
            max_line_length: 128,
            ..ClientConfig::default()
        };
        let settings = config.tcp_settings();
        assert_eq!(settings.address(), "127.0.0.1:3493");
        assert_eq!(settings.timeout, Some(Duration::from_secs(5)));
        assert_eq!(settings.max_line_length, 128);
    }
}
