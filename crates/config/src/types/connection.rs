//! Connection, namespace and polling configuration types.
//!
//! Responsibilities:
//! - Define connection settings (URL, TLS verification, timeouts, retries).
//! - Define the default namespace (owner/app) jobs are dispatched into.
//! - Define the poll cadence used while waiting on dispatch states.
//! - Define the main `Config` structure combining all of the above.
//!
//! Does NOT handle:
//! - Configuration loading from env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - Connection timeouts are serialized as seconds, poll intervals as milliseconds.
//! - `Config::default()` targets `https://localhost:8089` without a token.

use crate::constants::{
    DEFAULT_MAX_POLL_INTERVAL_MS, DEFAULT_MAX_RETRIES, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_SPLUNK_PORT, DEFAULT_TIMEOUT_SECS,
};
use crate::types::auth::AuthConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Module for serializing Duration as milliseconds (integer).
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Connection configuration for the Splunk management port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the Splunk server (e.g., https://localhost:8089)
    pub base_url: String,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Request timeout (serialized as seconds)
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    /// Maximum number of retries for rate-limited requests
    pub max_retries: usize,
}

impl ConnectionConfig {
    /// Connection settings for `base_url` with every other field at its default.
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Namespace jobs are dispatched into.
///
/// Both parts unset means the system namespace (`/services`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Owning user, or `-` for any user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// App context, or `-` for any app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
}

/// Poll cadence for dispatch-state waits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay before the second snapshot fetch (serialized as milliseconds)
    #[serde(with = "duration_millis")]
    pub poll_interval: Duration,
    /// Ceiling the backed-off delay never exceeds (serialized as milliseconds)
    #[serde(with = "duration_millis")]
    pub max_poll_interval: Duration,
    /// Overall bound on a single wait; `None` waits until reached, terminal or cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_secs: Option<u64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_interval: Duration::from_millis(DEFAULT_MAX_POLL_INTERVAL_MS),
            max_wait_secs: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Authentication settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Default namespace
    #[serde(default)]
    pub namespace: NamespaceConfig,
    /// Dispatch polling cadence
    #[serde(default)]
    pub polling: PollingConfig,
}

impl Default for Config {
    /// Local development configuration: `https://localhost:8089`, no token.
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::new(format!(
                "https://localhost:{}",
                DEFAULT_SPLUNK_PORT
            )),
            auth: AuthConfig::default(),
            namespace: NamespaceConfig::default(),
            polling: PollingConfig::default(),
        }
    }
}

impl Config {
    /// Create a new config with the specified base URL and API token.
    pub fn with_api_token(base_url: String, token: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig::with_token(token),
            namespace: NamespaceConfig::default(),
            polling: PollingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.connection.base_url, "https://localhost:8089");
        assert!(!config.connection.skip_verify);
        assert!(config.auth.token.is_none());
        assert_eq!(config.namespace, NamespaceConfig::default());
        assert_eq!(config.polling.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_config_with_api_token() {
        let token = SecretString::new("test-token".to_string().into());
        let config = Config::with_api_token("https://splunk.example.com:8089".to_string(), token);
        assert!(config.auth.token.is_some());
        assert_eq!(config.connection.base_url, "https://splunk.example.com:8089");
    }

    #[test]
    fn test_connection_config_serde_seconds() {
        let config = ConnectionConfig {
            base_url: "https://localhost:8089".to_string(),
            skip_verify: true,
            timeout: Duration::from_secs(60),
            max_retries: 5,
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"timeout\":60"));

        let deserialized: ConnectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.timeout, Duration::from_secs(60));
        assert_eq!(deserialized.max_retries, 5);
    }

    #[test]
    fn test_polling_config_serde_millis() {
        let polling = PollingConfig {
            poll_interval: Duration::from_millis(250),
            max_poll_interval: Duration::from_millis(2000),
            max_wait_secs: Some(120),
        };

        let json = serde_json::to_string(&polling).unwrap();
        assert!(json.contains("\"poll_interval\":250"));
        assert!(json.contains("\"max_poll_interval\":2000"));

        let deserialized: PollingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, polling);
    }

    #[test]
    fn test_config_missing_optional_sections_use_defaults() {
        let json = r#"{
            "connection": {
                "base_url": "https://splunk.example.com:8089",
                "skip_verify": false,
                "timeout": 30,
                "max_retries": 3
            }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.auth.token.is_none());
        assert_eq!(config.polling, PollingConfig::default());
        assert!(config.namespace.owner.is_none());
    }
}
