//! Server configuration.
//!
//! Loaded from a RON file; every field has a default so partial files work.
//!
//! ```ron
//! ServerConfig(
//!     default_board_size: 50,
//!     store_retry_attempts: 3,
//!     id_retry_limit: 64,
//!     rng_seed: Some(7),
//! )
//! ```

use std::path::Path;

use dino_core::board::MAX_BOARD_SIZE;
use dino_core::entity::DEFAULT_ID_RETRY_LIMIT;
use dino_core::repository::{RepositoryConfig, DEFAULT_STORE_ATTEMPTS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board size used when a request does not give one.
pub const DEFAULT_BOARD_SIZE: i64 = 50;

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Parsed but unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Board size for `create_battle` requests without a size.
    pub default_board_size: i64,
    /// Attempts per store call before giving up.
    pub store_retry_attempts: u32,
    /// Random draws per battle or entity id before giving up.
    pub id_retry_limit: u32,
    /// Fixed seed for id generation. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_board_size: DEFAULT_BOARD_SIZE,
            store_retry_attempts: DEFAULT_STORE_ATTEMPTS,
            id_retry_limit: DEFAULT_ID_RETRY_LIMIT,
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    /// Load a config from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size_ok = usize::try_from(self.default_board_size)
            .is_ok_and(|size| (1..=MAX_BOARD_SIZE).contains(&size));
        if !size_ok {
            return Err(ConfigError::Invalid(format!(
                "default_board_size must be between 1 and {MAX_BOARD_SIZE}, got {}",
                self.default_board_size
            )));
        }
        if self.store_retry_attempts == 0 {
            return Err(ConfigError::Invalid(
                "store_retry_attempts must be at least 1".to_string(),
            ));
        }
        if self.id_retry_limit == 0 {
            return Err(ConfigError::Invalid(
                "id_retry_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Repository settings derived from this config.
    #[must_use]
    pub fn repository(&self) -> RepositoryConfig {
        RepositoryConfig {
            store_attempts: self.store_retry_attempts,
            id_retry_limit: self.id_retry_limit,
            rng_seed: self.rng_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.default_board_size, 50);
        assert_eq!(config.store_retry_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron() {
        let config = ServerConfig::from_ron_str("(default_board_size: 9, rng_seed: Some(4))").unwrap();
        assert_eq!(config.default_board_size, 9);
        assert_eq!(config.rng_seed, Some(4));
        assert_eq!(config.id_retry_limit, DEFAULT_ID_RETRY_LIMIT);
        assert_eq!(config.repository().rng_seed, Some(4));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ServerConfig::from_ron_str("(default_board_size: 0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ServerConfig::from_ron_str("(default_board_size: 5000)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ServerConfig::from_ron_str("(store_retry_attempts: 0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ServerConfig::from_ron_str("(default_board_size: \"big\")"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/server.ron");
        let config = ServerConfig::load(path).unwrap();
        assert_eq!(config.default_board_size, DEFAULT_BOARD_SIZE);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ServerConfig::load("/definitely/not/here.ron"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
