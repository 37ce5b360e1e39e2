//! Session Configuration

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::game::cache::clamp_capacity;
use crate::{DEFAULT_CACHE_CAPACITY, MIN_CACHE_CAPACITY, MAX_CACHE_CAPACITY};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config JSON is malformed.
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its supported range.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Offending field
        field: &'static str,
        /// Supplied value
        value: usize,
        /// Lower bound
        min: usize,
        /// Upper bound
        max: usize,
    },
}

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cache capacity (clamped to [3, 10] on use).
    pub cache_capacity: usize,
    /// Draw seed. `None` derives one from a fresh session id.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Config with a fixed seed and default capacity.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Strict check for callers that want to reject instead of clamp.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_CACHE_CAPACITY..=MAX_CACHE_CAPACITY).contains(&self.cache_capacity) {
            return Err(ConfigError::OutOfRange {
                field: "cache_capacity",
                value: self.cache_capacity,
                min: MIN_CACHE_CAPACITY,
                max: MAX_CACHE_CAPACITY,
            });
        }
        Ok(())
    }

    /// Capacity actually applied to the cache.
    pub fn effective_cache_capacity(&self) -> usize {
        clamp_capacity(self.cache_capacity)
    }
}
