//! Serde description of a singleton: which policy, and the payload defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::policy::InitPolicy;

/// Default database name of the mock payload.
pub const MOCK_DATABASE_NAME: &str = "mockDatabaseName";
/// Default host of the mock payload.
pub const DEFAULT_HOST: &str = "localhost";
/// Default port of the mock payload.
pub const DEFAULT_PORT: &str = "5432";

/// Plain-data form of [`ConnectionSettings`](crate::ConnectionSettings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Fixed at construction.
    pub database_name: String,
    /// Initial host.
    pub host: String,
    /// Initial port, kept as text.
    pub port: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            database_name: MOCK_DATABASE_NAME.to_owned(),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT.to_owned(),
        }
    }
}

/// A singleton described as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingletonConfig {
    /// How the holder constructs its value.
    pub policy: InitPolicy,
    /// Values the factory builds the payload from.
    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl SingletonConfig {
    /// Parses a JSON description.
    ///
    /// # Errors
    /// Malformed JSON or an unknown policy name.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid singleton config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_connection_uses_mock_defaults() {
        let config = SingletonConfig::from_json(r#"{ "policy": "lazy_safe_lock" }"#).unwrap();
        assert_eq!(config.policy, InitPolicy::LazySafeLock);
        assert_eq!(config.connection, ConnectionConfig::default());
    }

    #[test]
    fn test_partial_connection_fills_remaining_fields() {
        let config = SingletonConfig::from_json(
            r#"{ "policy": "eager", "connection": { "port": "1234" } }"#,
        )
        .unwrap();
        assert_eq!(config.connection.port, "1234");
        assert_eq!(config.connection.host, DEFAULT_HOST);
        assert_eq!(config.connection.database_name, MOCK_DATABASE_NAME);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = SingletonConfig::from_json(r#"{ "policy": "double_checked" }"#).unwrap_err();
        assert_eq!(err.to_string(), "invalid singleton config");
    }
}
