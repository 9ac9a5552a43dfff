//! Configuration Loader
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML/YAML file, and
//! `NETASK__`-prefixed environment variables (`__` separates nesting levels).

use super::error::{ConfigResult, ConfigurationError};
use super::NetaskConfig;
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const ENV_PREFIX: &str = "NETASK";

#[derive(Debug)]
pub struct ConfigManager {
    config: NetaskConfig,
    environment: String,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// Defaults plus environment overrides
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::build(None, Self::environment_source())
    }

    /// Load `path` (which must exist) plus environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Arc<ConfigManager>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigurationError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::build(Some(path), Self::environment_source())
    }

    /// Load `path` without consulting the process environment
    pub fn load_file_only(path: impl AsRef<Path>) -> ConfigResult<Arc<ConfigManager>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigurationError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::build(Some(path), None)
    }

    fn environment_source() -> Option<Environment> {
        Some(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn build(path: Option<&Path>, env: Option<Environment>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = crate::logging::get_environment();
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let config: NetaskConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        info!(
            environment = %environment,
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".to_string()),
            cache_enabled = config.cache.enabled,
            scheduler_enabled = config.scheduler.enabled,
            "⚙️ Configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment,
            source: path.map(Path::to_path_buf),
        }))
    }

    pub fn config(&self) -> &NetaskConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// JSON form for diagnostics
    pub fn debug_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}
