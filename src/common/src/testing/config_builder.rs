//! Test configuration builder for creating test setups quickly.

use std::time::Duration;

use crate::config::{Configuration, LogFormat};

/// Builder for configurations suitable for tests.
///
/// Starts from [`Configuration::default`] and lets tests override only the
/// knobs they care about.
#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: Configuration,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Configuration::default(),
        }
    }

    /// Set the registry freshness window.
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.config.registry.freshness_window = window;
        self
    }

    /// Enable the background sweep at the given interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.config.registry.sweep_interval = Some(interval);
        self
    }

    /// Disable the background sweep.
    pub fn without_sweep(mut self) -> Self {
        self.config.registry.sweep_interval = None;
        self
    }

    /// Only log warnings and errors, in compact form.
    pub fn quiet(mut self) -> Self {
        self.config.logging.level = "warn".to_string();
        self.config.logging.format = LogFormat::Compact;
        self
    }

    pub fn build(self) -> Configuration {
        self.config
    }
}
