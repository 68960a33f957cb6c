use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use common::config::{DEFAULT_FRESHNESS_WINDOW, RegistryConfig};

use crate::clock::{Clock, SystemClock};
use crate::error::{MissingRecord, RegistryError, Result};
use crate::instance::{InstanceId, InstanceRecord, InstanceSnapshot, ServiceName};

type Instances = HashMap<InstanceId, InstanceRecord>;

/// In-memory service registry.
///
/// Holds, per service name, the instances that announced themselves and the
/// time of their last heartbeat. Staleness is never stored: a record is
/// checked against the freshness window when it is read, so stale records
/// stay in the map (and can be revived by a heartbeat) until they are
/// deregistered or removed by [`Registry::sweep`].
///
/// All mutations take the write lock, reads take the read lock. Each
/// operation is atomic on its own; sequences of calls are not.
pub struct Registry {
    services: RwLock<HashMap<ServiceName, Instances>>,
    clock: Arc<dyn Clock>,
    freshness_window: Duration,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("freshness_window", &self.freshness_window)
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry on wall-clock time with the default five second window.
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            clock: Arc::new(SystemClock),
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
        }
    }

    /// Registry with an explicit time source and freshness window.
    pub fn with_clock(clock: Arc<dyn Clock>, freshness_window: Duration) -> Result<Self> {
        Ok(Self {
            services: RwLock::new(HashMap::new()),
            clock,
            freshness_window: checked_window(freshness_window)?,
        })
    }

    /// Registry on wall-clock time configured from [`RegistryConfig`].
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        Self::with_clock(Arc::new(SystemClock), config.freshness_window)
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    // Every mutation is a single insert, assignment or removal, so the map is
    // consistent even if a holder panicked; recover the guard instead of failing.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ServiceName, Instances>> {
        self.services.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ServiceName, Instances>> {
        self.services.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create or overwrite the record for `(service, instance)`.
    ///
    /// Re-registering an existing instance replaces its address and resets
    /// its freshness.
    pub fn register(
        &self,
        service: &ServiceName,
        instance: &InstanceId,
        address: impl Into<String>,
    ) {
        let address = address.into();
        let mut services = self.write();
        let now = self.clock.now();

        log::debug!("Registering instance {instance} of {service} at {address}");
        services
            .entry(service.clone())
            .or_default()
            .insert(instance.clone(), InstanceRecord::new(address, now));
    }

    /// Remove the record if present. Unknown pairs are a silent no-op.
    pub fn deregister(&self, service: &ServiceName, instance: &InstanceId) {
        let mut services = self.write();
        let Some(instances) = services.get_mut(service) else {
            return;
        };

        if instances.remove(instance).is_some() {
            log::debug!("Deregistered instance {instance} of {service}");
        }
        if instances.is_empty() {
            services.remove(service);
        }
    }

    /// Refresh the last-heartbeat time of an existing record.
    pub fn heartbeat(&self, service: &ServiceName, instance: &InstanceId) -> Result<()> {
        let mut services = self.write();
        let now = self.clock.now();

        let not_registered = |cause: MissingRecord| RegistryError::NotRegistered {
            service: service.clone(),
            instance: instance.clone(),
            cause,
        };

        let instances = services
            .get_mut(service)
            .ok_or_else(|| not_registered(MissingRecord::UnknownService))?;
        let record = instances
            .get_mut(instance)
            .ok_or_else(|| not_registered(MissingRecord::UnknownInstance))?;

        record.touch(now);
        log::trace!("Heartbeat from instance {instance} of {service}");
        Ok(())
    }

    /// Addresses of every fresh instance of `service`, in no particular order.
    ///
    /// Fails with [`RegistryError::NotFound`] both when the service is
    /// unknown and when all of its instances are stale.
    pub fn resolve(&self, service: &ServiceName) -> Result<Vec<String>> {
        let services = self.read();
        let now = self.clock.now();

        let addresses: Vec<String> = services
            .get(service)
            .into_iter()
            .flat_map(|instances| instances.values())
            .filter(|record| record.is_fresh(now, self.freshness_window))
            .map(|record| record.address.clone())
            .collect();

        if addresses.is_empty() {
            return Err(RegistryError::NotFound {
                service: service.clone(),
            });
        }
        Ok(addresses)
    }

    /// Every record of `service`, stale ones included and flagged.
    pub fn instances(&self, service: &ServiceName) -> Vec<InstanceSnapshot> {
        let services = self.read();
        let now = self.clock.now();

        let Some(instances) = services.get(service) else {
            return Vec::new();
        };
        instances
            .iter()
            .map(|(id, record)| InstanceSnapshot {
                service: service.clone(),
                instance: id.clone(),
                address: record.address.clone(),
                last_heartbeat: record.last_heartbeat,
                fresh: record.is_fresh(now, self.freshness_window),
            })
            .collect()
    }

    /// Names of all services with at least one record, fresh or not.
    pub fn services(&self) -> Vec<ServiceName> {
        self.read()
            .iter()
            .filter(|(_, instances)| !instances.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Total number of records across all services.
    pub fn len(&self) -> usize {
        self.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop stale records and services left without instances.
    ///
    /// Resolve never calls this; it exists for deployments that need bounded
    /// memory and is normally driven by [`crate::sweeper::Sweeper`].
    pub fn sweep(&self) -> usize {
        let mut services = self.write();
        let now = self.clock.now();
        let window = self.freshness_window;
        let mut removed = 0;

        services.retain(|service, instances| {
            instances.retain(|instance, record| {
                let fresh = record.is_fresh(now, window);
                if !fresh {
                    log::debug!(
                        "Sweeping stale instance {instance} of {service}, last heartbeat {}",
                        record.last_heartbeat
                    );
                    removed += 1;
                }
                fresh
            });
            !instances.is_empty()
        });

        if removed > 0 {
            log::info!("Swept {removed} stale instance(s) from registry");
        }
        removed
    }
}

fn checked_window(window: Duration) -> Result<Duration> {
    if window.is_zero() {
        return Err(RegistryError::InvalidConfig(
            "freshness window must be greater than zero".to_string(),
        ));
    }
    Ok(window)
}
