use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Engine host cannot be empty")]
    EmptyEngineHost,

    #[error("Backend host cannot be empty")]
    EmptyBackendHost,

    #[error("Storage data_dir cannot be empty")]
    EmptyDataDir,

    #[error("Invalid readiness max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error("Invalid poll interval: {0}s. Must be at least 1")]
    InvalidPollInterval(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Configured flow_id cannot be empty")]
    EmptyFlowId,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .flowsync/config.yaml (project config)
    /// 3. .flowsync/local.yaml (project local overrides, optional)
    /// 4. Environment variables (FLOWSYNC_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".flowsync/config.yaml"))
            .merge(Yaml::file(".flowsync/local.yaml"))
            .merge(Env::prefixed("FLOWSYNC_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.engine.host.trim().is_empty() {
            return Err(ConfigError::EmptyEngineHost);
        }

        if config.backend.host.trim().is_empty() {
            return Err(ConfigError::EmptyBackendHost);
        }

        if config.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }

        if config.readiness.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(
                config.readiness.max_attempts,
            ));
        }

        if config.readiness.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidPollInterval(
                config.readiness.poll_interval_secs,
            ));
        }

        if config.watcher.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidPollInterval(
                config.watcher.poll_interval_secs,
            ));
        }

        // An empty override would shadow every other resolution source.
        if let Some(flow_id) = &config.flow_id {
            if flow_id.trim().is_empty() {
                return Err(ConfigError::EmptyFlowId);
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
