// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lockbreak configuration
//!
//! Loaded from TOML. Every field has a default, so a missing file or an empty
//! table behaves the same as the built-in policy: fence before breaking, with
//! the cluster's default blocklist expiry.

use crate::breaker::BreakOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockbreakConfig {
    #[serde(rename = "break")]
    pub break_lock: BreakConfig,
    pub log: LogConfig,
}

/// Policy applied to break attempts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakConfig {
    /// Blocklist the holder before clearing its lock
    pub blocklist_on_break: bool,
    /// Blocklist entry lifetime; zero defers to the cluster default
    #[serde(with = "humantime_serde")]
    pub blocklist_expire: Duration,
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            blocklist_on_break: true,
            blocklist_expire: Duration::ZERO,
        }
    }
}

impl BreakConfig {
    pub fn with_blocklist_on_break(mut self, enabled: bool) -> Self {
        self.blocklist_on_break = enabled;
        self
    }

    pub fn with_blocklist_expire(mut self, expire: Duration) -> Self {
        self.blocklist_expire = expire;
        self
    }

    /// Options for one attempt under this policy
    pub fn options(&self, force: bool) -> BreakOptions {
        BreakOptions {
            fencing_enabled: self.blocklist_on_break,
            force,
            blocklist_expire: self.blocklist_expire,
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl LockbreakConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Load configuration if the file exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
