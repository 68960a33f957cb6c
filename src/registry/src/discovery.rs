//! Async seam for layering the registry behind a network-facing service.
//!
//! The in-memory [`Registry`] completes every call without suspending, so
//! dropping one of these futures (the Rust form of cancellation) has no
//! observable effect. Remote backends implementing the trait get deadline
//! and cancellation propagation from the same contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::instance::{InstanceId, ServiceName};
use crate::registry::Registry;

#[async_trait]
pub trait Discovery: Send + Sync {
    /// Create or refresh an instance record. Never fails for valid names.
    async fn register(
        &self,
        service: &ServiceName,
        instance: &InstanceId,
        address: &str,
    ) -> Result<()>;

    /// Remove an instance record; unknown instances are not an error.
    async fn deregister(&self, service: &ServiceName, instance: &InstanceId) -> Result<()>;

    /// Report an instance as alive. Fails with `NotRegistered` for unknown pairs.
    async fn heartbeat(&self, service: &ServiceName, instance: &InstanceId) -> Result<()>;

    /// Addresses of the currently healthy instances. Fails with `NotFound` if there are none.
    async fn resolve(&self, service: &ServiceName) -> Result<Vec<String>>;
}

#[async_trait]
impl Discovery for Registry {
    async fn register(
        &self,
        service: &ServiceName,
        instance: &InstanceId,
        address: &str,
    ) -> Result<()> {
        Registry::register(self, service, instance, address);
        Ok(())
    }

    async fn deregister(&self, service: &ServiceName, instance: &InstanceId) -> Result<()> {
        Registry::deregister(self, service, instance);
        Ok(())
    }

    async fn heartbeat(&self, service: &ServiceName, instance: &InstanceId) -> Result<()> {
        Registry::heartbeat(self, service, instance)
    }

    async fn resolve(&self, service: &ServiceName) -> Result<Vec<String>> {
        Registry::resolve(self, service)
    }
}
