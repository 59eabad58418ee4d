//! Client configuration
//!
//! Chain parameters live in `<home>/config.json`. Command line flags
//! override the stored values for a single invocation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::DEFAULT_BECH32_PREFIX;

/// Name of the configuration file inside the home directory
pub const CONFIG_FILE: &str = "config.json";

/// Default gas limit for a single contract message
pub const DEFAULT_GAS: u64 = 200_000;

/// Default chain id
pub const DEFAULT_CHAIN_ID: &str = "fetchhub";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings shared by every transaction command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub chain_id: String,
    pub bech32_prefix: String,
    pub gas: u64,
    /// Fee coins, e.g. `"5000afet"`; empty for no fee
    pub fees: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            bech32_prefix: DEFAULT_BECH32_PREFIX.to_string(),
            gas: DEFAULT_GAS,
            fees: String::new(),
        }
    }
}

impl ClientConfig {
    /// Path of the configuration file under `home`
    pub fn path(home: &Path) -> PathBuf {
        home.join(CONFIG_FILE)
    }

    /// Load the stored configuration, falling back to defaults when absent
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(home);
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let json = fs::read_to_string(&path)?;
        let config: ClientConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, home: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        fs::create_dir_all(home)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(Self::path(home), json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id.trim().is_empty() {
            return Err(ConfigError::Invalid("chain_id must not be empty".into()));
        }
        if self.bech32_prefix.is_empty()
            || !self
                .bech32_prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(ConfigError::Invalid(format!(
                "bech32_prefix must be lowercase alphanumeric, got {:?}",
                self.bech32_prefix
            )));
        }
        if self.gas == 0 {
            return Err(ConfigError::Invalid("gas must be positive".into()));
        }
        Ok(())
    }
}
