// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data source configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("auto checkpoint frequency must be positive")]
    InvalidCheckpointFrequency,
}

/// Data source configuration
///
/// ```toml
/// auto_checkpoint_frequency = 10
/// ack_effective = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    /// Insert a metadata checkpoint after this many operations; `None` disables it
    pub auto_checkpoint_frequency: Option<u64>,
    /// Whether acknowledgements actually truncate the log
    pub ack_effective: bool,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            auto_checkpoint_frequency: None,
            ack_effective: true,
        }
    }
}

impl DataSourceConfig {
    pub fn with_auto_checkpoint_frequency(mut self, frequency: u64) -> Self {
        self.auto_checkpoint_frequency = Some(frequency);
        self
    }

    pub fn with_ack_effective(mut self, effective: bool) -> Self {
        self.ack_effective = effective;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auto_checkpoint_frequency == Some(0) {
            return Err(ConfigError::InvalidCheckpointFrequency);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
