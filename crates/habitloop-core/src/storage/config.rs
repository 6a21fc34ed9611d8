//! TOML-based application configuration.
//!
//! Stores engine tuning knobs:
//! - Trailing window for system consistency (default: lifetime)
//! - Streak grace allowance (default: never miss twice)
//!
//! Configuration is stored at `~/.config/habitloop/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::stats::{CompletionAggregator, StreakCalculator, StreakPolicy};

/// Statistics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Trailing window in days for system consistency; absent or zero
    /// means full lifetime.
    #[serde(default)]
    pub consistency_window_days: Option<u32>,
}

/// Streak configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Consecutive misses tolerated before a streak ends.
    #[serde(default = "default_max_consecutive_misses")]
    pub max_consecutive_misses: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitloop/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub streak: StreakConfig,
}

fn default_max_consecutive_misses() -> u32 {
    1
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { consistency_window_days: None }
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self { max_consecutive_misses: default_max_consecutive_misses() }
    }
}

impl Config {
    /// Path of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/habitloop"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the config, falling back to defaults when the file is
    /// missing. A malformed file is an error rather than silently
    /// resetting the user's settings.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the config.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Streak calculator configured from this config.
    pub fn streak_calculator(&self) -> StreakCalculator {
        StreakCalculator::with_policy(StreakPolicy {
            max_consecutive_misses: self.streak.max_consecutive_misses,
        })
    }

    /// Completion aggregator configured from this config.
    pub fn completion_aggregator(&self) -> CompletionAggregator {
        match self.stats.consistency_window_days {
            Some(days) => CompletionAggregator::with_trailing_window(days),
            None => CompletionAggregator::lifetime(),
        }
    }
}
