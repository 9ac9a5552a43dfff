//! # Configuration
//!
//! Typed settings for the cache, header aliases, tasks, the refresh scheduler and
//! logging. Every section has defaults, so an empty file (or no file) is valid.
//!
//! ```toml
//! [cache]
//! enabled = true
//! default_backoff_secs = 60
//! date_only_fallback = { mode = "heuristic", window_secs = 3600 }
//!
//! [headers.overrides]
//! next_refresh = ["X-Acme-Refresh"]
//!
//! [task]
//! default_timeout_ms = 30000
//! synchronous_timeout_multiplier = 2
//! max_recovery_restarts = 3
//! ```
//!
//! Environment variables prefixed `NETASK__` override file values, e.g.
//! `NETASK__TASK__MAX_RECOVERY_RESTARTS=5`.

pub mod error;
pub mod loader;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

use crate::cache::DateOnlyFallback;
use crate::constants::{
    DEFAULT_MAX_RECOVERY_RESTARTS, DEFAULT_REFRESH_BACKOFF, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SYNCHRONOUS_TIMEOUT_MULTIPLIER,
};
use crate::http::HeaderAliases;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetaskConfig {
    pub cache: CacheConfig,
    pub headers: HeaderAliases,
    pub task: TaskConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
}

impl NetaskConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.cache.validate()?;
        self.task.validate()?;
        self.headers
            .validate()
            .map_err(ConfigurationError::validation_error)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Disabled caches never store or serve entries
    pub enabled: bool,
    pub date_only_fallback: DateOnlyFallback,
    /// Refresh backoff used when a response carries no backoff header
    pub default_backoff_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            date_only_fallback: DateOnlyFallback::default(),
            default_backoff_secs: DEFAULT_REFRESH_BACKOFF.as_secs(),
        }
    }
}

impl CacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let DateOnlyFallback::Heuristic { window_secs: 0 } = self.date_only_fallback {
            return Err(ConfigurationError::invalid_value(
                "cache.date_only_fallback.window_secs",
                0,
                "heuristic window must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub default_timeout_ms: u64,
    /// `start_blocking` waits this many request timeouts
    pub synchronous_timeout_multiplier: u32,
    /// Recovery restarts allowed per `start()`
    pub max_recovery_restarts: u32,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            synchronous_timeout_multiplier: DEFAULT_SYNCHRONOUS_TIMEOUT_MULTIPLIER,
            max_recovery_restarts: DEFAULT_MAX_RECOVERY_RESTARTS,
        }
    }
}

impl TaskConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.default_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "task.default_timeout_ms",
                self.default_timeout_ms,
                "timeout must be positive",
            ));
        }
        if self.synchronous_timeout_multiplier == 0 {
            return Err(ConfigurationError::invalid_value(
                "task.synchronous_timeout_multiplier",
                self.synchronous_timeout_multiplier,
                "multiplier must be at least 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; the environment decides when unset
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}
