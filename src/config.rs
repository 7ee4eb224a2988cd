//! # Configuration Management
//!
//! Centralized configuration for the intake server.
//!
//! This module provides structured configuration for the listener set and
//! logging, covering the bind host, the fixed port set, and the log level.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Environment variables via `from_env()` (`FRAMESINK_*`)
//! - Direct instantiation with defaults
//!
//! Defaults match the reference deployment: four adjacent ports on the
//! loopback interface.

use crate::error::{Result, SinkError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Ports the reference deployment listens on
pub const DEFAULT_PORTS: [u16; 4] = [4000, 4001, 4002, 4003];

/// Interface the reference deployment binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SinkConfig {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SinkConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| SinkError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| SinkError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| SinkError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("FRAMESINK_HOST") {
            config.server.host = host;
        }

        if let Ok(ports) = std::env::var("FRAMESINK_PORTS") {
            config.server.ports = ports
                .split(',')
                .map(|p| {
                    p.trim().parse::<u16>().map_err(|_| {
                        SinkError::ConfigError(format!("Invalid port in FRAMESINK_PORTS: '{p}'"))
                    })
                })
                .collect::<Result<Vec<u16>>>()?;
        }

        if let Ok(level) = std::env::var("FRAMESINK_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| SinkError::ConfigError(format!("Invalid log level: '{level}'")))?;
        }

        Ok(config)
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SinkError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "127.0.0.1")
    pub host: String,

    /// Ports to listen on; every port gets its own listener
    pub ports: Vec<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            ports: DEFAULT_PORTS.to_vec(),
        }
    }
}

impl ServerConfig {
    /// Validate listener configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push("Bind host cannot be empty".to_string());
        } else if self.host.parse::<std::net::IpAddr>().is_err() {
            errors.push(format!(
                "Invalid bind host: '{}' (expected an IP address like '127.0.0.1')",
                self.host
            ));
        }

        if self.ports.is_empty() {
            errors.push("At least one listen port must be configured".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for port in &self.ports {
            if !seen.insert(port) {
                errors.push(format!("Duplicate listen port: {port}"));
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
        }
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = SinkConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.ports, vec![4000, 4001, 4002, 4003]);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn toml_round_trip() {
        let config = SinkConfig::from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            ports = [5000, 5001]

            [logging]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.ports, vec![5000, 5001]);
        assert_eq!(config.logging.log_level, Level::DEBUG);
    }

    #[test]
    fn loads_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server]\nhost = \"127.0.0.1\"\nports = [4100]\n").unwrap();

        let config = SinkConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.ports, vec![4100]);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        assert!(matches!(
            SinkConfig::from_file("/nonexistent/framesink.toml"),
            Err(SinkError::ConfigError(_))
        ));
    }

    #[test]
    fn rejects_duplicate_ports() {
        let config = SinkConfig::from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            ports = [4000, 4000]
            "#,
        )
        .unwrap();

        assert!(config.validate_strict().is_err());
    }

    #[test]
    fn rejects_empty_port_set() {
        let config = SinkConfig::from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            ports = []
            "#,
        )
        .unwrap();

        let errors = config.validate();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn rejects_bad_host() {
        let config = SinkConfig::from_toml(
            r#"
            [server]
            host = "not-an-ip"
            ports = [4000]
            "#,
        )
        .unwrap();

        assert!(!config.validate().is_empty());
    }
}
