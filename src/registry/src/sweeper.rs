//! Optional background removal of stale records.
//!
//! Resolution already ignores stale instances; the sweeper only bounds memory
//! in long-running processes where instances die without deregistering.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::registry::Registry;

/// Handle to a running sweep task. The task stops when the handle is shut
/// down or dropped, or once the registry itself has been dropped.
#[derive(Debug)]
pub struct Sweeper {
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Sweeper {
    /// Spawn a task that calls [`Registry::sweep`] every `interval`.
    ///
    /// Must be called from within a tokio runtime. The first sweep happens
    /// one full interval after spawning.
    pub fn spawn(registry: &Arc<Registry>, interval: Duration) -> Self {
        let registry: Weak<Registry> = Arc::downgrade(registry);
        log::info!("Starting registry sweeper with interval: {interval:?}");

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(registry) = registry.upgrade() else {
                    log::debug!("Registry dropped, stopping sweeper");
                    break;
                };
                registry.sweep();
            }
        });

        Self {
            handle: Some(handle),
            interval,
        }
    }

    /// Spawn a sweeper when the configuration asks for one.
    pub fn from_config(
        registry: &Arc<Registry>,
        config: &common::config::RegistryConfig,
    ) -> Option<Self> {
        config
            .sweep_interval
            .map(|interval| Self::spawn(registry, interval))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the sweep task and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
            log::info!("Registry sweeper stopped");
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
