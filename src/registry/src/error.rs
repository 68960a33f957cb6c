use crate::instance::{InstanceId, ServiceName};

/// Which half of a `(service, instance)` key was missing on heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRecord {
    /// The service has no instances at all.
    UnknownService,
    /// The service exists but this instance id was never registered.
    UnknownInstance,
}

impl std::fmt::Display for MissingRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MissingRecord::UnknownService => "service is not registered yet",
            MissingRecord::UnknownInstance => "service instance is not registered yet",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No fresh instance is currently resolvable for the service, either
    /// because none was ever registered or because all of them went stale.
    #[error("no healthy instances of service {service}")]
    NotFound { service: ServiceName },
    /// Heartbeat for a pair with no record; the caller must re-register.
    #[error("instance {instance} of service {service} is not registered: {cause}")]
    NotRegistered {
        service: ServiceName,
        instance: InstanceId,
        cause: MissingRecord,
    },
    #[error("{kind} must not be empty")]
    InvalidName { kind: &'static str },
    #[error("invalid registry configuration: {0}")]
    InvalidConfig(String),
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    pub fn is_not_registered(&self) -> bool {
        matches!(self, RegistryError::NotRegistered { .. })
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
