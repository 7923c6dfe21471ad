//! Store configuration.
//!
//! Configuration is loaded from environment variables with development
//! defaults; `validate()` rejects values the store cannot operate with.

use std::path::PathBuf;

use crate::{ConfigError, DEFAULT_LOG_CAPACITY};

/// Configuration for the dual-backend store layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Remote key-value backend host.
    pub remote_host: String,
    /// Remote key-value backend port.
    pub remote_port: u16,
    /// Directory holding the per-key local cache files.
    pub cache_dir: PathBuf,
    /// Number of log entries a freshly created slot document holds.
    pub log_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            remote_host: "127.0.0.1".to_string(),
            remote_port: 6379,
            cache_dir: PathBuf::from("tmp"),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Create a StoreConfig from environment variables.
    ///
    /// Environment variables:
    /// - `HOOKSLOT_REDIS_HOST`: Remote backend host (default: 127.0.0.1)
    /// - `HOOKSLOT_REDIS_PORT`: Remote backend port (default: 6379)
    /// - `HOOKSLOT_CACHE_DIR`: Local cache directory (default: tmp)
    /// - `HOOKSLOT_LOG_CAPACITY`: Circular log capacity (default: 100)
    ///
    /// Unparseable values fall back to the defaults; `validate()` catches
    /// semantically invalid ones.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let remote_host = std::env::var("HOOKSLOT_REDIS_HOST")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.remote_host);

        let remote_port = std::env::var("HOOKSLOT_REDIS_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.remote_port);

        let cache_dir = std::env::var("HOOKSLOT_CACHE_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);

        let log_capacity = std::env::var("HOOKSLOT_LOG_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.log_capacity);

        Self {
            remote_host,
            remote_port,
            cache_dir,
            log_capacity,
        }
    }

    /// Remote backend address in `host:port` form.
    pub fn remote_addr(&self) -> String {
        format!("{}:{}", self.remote_host, self.remote_port)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote_host.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "remote_host".to_string(),
            });
        }

        if self.remote_port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote_port".to_string(),
                value: "0".to_string(),
                reason: "port must be non-zero".to_string(),
            });
        }

        if self.log_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "log_capacity".to_string(),
                value: "0".to_string(),
                reason: "circular log needs at least one slot".to_string(),
            });
        }

        if self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "cache_dir".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.remote_host, "127.0.0.1");
        assert_eq!(config.remote_port, 6379);
        assert_eq!(config.cache_dir, PathBuf::from("tmp"));
        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_addr() {
        let config = StoreConfig {
            remote_host: "redis.internal".to_string(),
            remote_port: 6380,
            ..StoreConfig::default()
        };
        assert_eq!(config.remote_addr(), "redis.internal:6380");
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = StoreConfig {
            log_capacity: 0,
            ..StoreConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "log_capacity"));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = StoreConfig {
            remote_port: 0,
            ..StoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let config = StoreConfig {
            remote_host: String::new(),
            ..StoreConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { ref field } if field == "remote_host"));
    }
}
