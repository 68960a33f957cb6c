use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// Default configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "waypoint.toml";

/// Prefix for environment overrides, e.g. `WAYPOINT__REGISTRY__FRESHNESS_WINDOW=10s`.
pub const ENV_PREFIX: &str = "WAYPOINT__";

/// Freshness window used when none is configured.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(5);

/// Configuration for the in-memory service registry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegistryConfig {
    /// Maximum gap since the last heartbeat for an instance to be resolvable
    #[serde(with = "humantime_serde")]
    pub freshness_window: Duration,
    /// Interval of the optional background sweep that drops stale records.
    /// Disabled when unset; stale records are then only filtered at resolve time.
    #[serde(default, with = "humantime_serde")]
    pub sweep_interval: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            sweep_interval: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: LogFormat::Full,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Configuration {
    /// Registry liveness settings
    pub registry: RegistryConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

impl Configuration {
    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
    }

    /// Load defaults, then `waypoint.toml`, then `WAYPOINT__` environment variables.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config = Self::figment()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }

    /// Same layering as [`Configuration::load`] with an explicit file path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let config = Self::figment()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }

    /// Reject settings the registry cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.registry.freshness_window.is_zero() {
            anyhow::bail!("registry.freshness_window must be greater than zero");
        }

        if self.registry.sweep_interval.is_some_and(|i| i.is_zero()) {
            anyhow::bail!("registry.sweep_interval must be greater than zero when set");
        }

        if self.logging.level.trim().is_empty() {
            anyhow::bail!("logging.level cannot be empty");
        }

        Ok(())
    }
}

/// Load configuration from an optional explicit path and validate it.
pub fn load_config(config_path: Option<&Path>) -> Result<Configuration> {
    let config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path.display());
            Configuration::load_from_path(path).context("Failed to load configuration")?
        }
        None => Configuration::load().context("Failed to load configuration")?,
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
