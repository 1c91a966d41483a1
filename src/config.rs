// src/config.rs

//! Manages server configuration: loading, defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Configuration for snapshot persistence.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PersistenceConfig {
    /// Path of the JSON snapshot file, loaded at startup and written at shutdown.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// Configuration for the graceful shutdown sequence.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ShutdownConfig {
    /// How long warned connections may linger before they are force-closed.
    #[serde(with = "humantime_serde", default = "default_grace_period")]
    pub grace_period: Duration,
    /// Upper bound on a single accept wait. The accept loop re-checks the
    /// stop flag at this interval, so it also bounds shutdown latency.
    #[serde(with = "humantime_serde", default = "default_accept_poll_interval")]
    pub accept_poll_interval: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period: default_grace_period(),
            accept_poll_interval: default_accept_poll_interval(),
        }
    }
}

fn default_snapshot_path() -> String {
    "db.json".to_string()
}
fn default_grace_period() -> Duration {
    Duration::from_secs(10)
}
fn default_accept_poll_interval() -> Duration {
    Duration::from_secs(2)
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}

/// The top-level server configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log level used when the RUST_LOG environment variable is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            persistence: PersistenceConfig::default(),
            shutdown: ShutdownConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates a configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.persistence.snapshot_path.is_empty() {
            return Err(anyhow!("persistence.snapshot_path must not be empty"));
        }
        if self.shutdown.accept_poll_interval.is_zero() {
            return Err(anyhow!("shutdown.accept_poll_interval must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.persistence.snapshot_path, "db.json");
        assert_eq!(config.shutdown.grace_period, Duration::from_secs(10));
        assert_eq!(config.shutdown.accept_poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            port = 9090

            [shutdown]
            grace_period = "3s"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.shutdown.grace_period, Duration::from_secs(3));
        assert_eq!(config.shutdown.accept_poll_interval, Duration::from_secs(2));
    }
}
