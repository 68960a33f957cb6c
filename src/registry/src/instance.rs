use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Build a name, rejecting empty or whitespace-only input.
            pub fn new(value: impl Into<String>) -> Result<Self, RegistryError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(RegistryError::InvalidName { kind: $kind });
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = RegistryError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = RegistryError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = RegistryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        // Lets maps keyed by this type be queried with a plain `&str`.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_type!(
    /// Logical service name, e.g. `movie-metadata`.
    ServiceName,
    "service name"
);

name_type!(
    /// Identity of one instance within a service, chosen by the registering process.
    InstanceId,
    "instance id"
);

/// Liveness record of one running instance. Owned exclusively by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    /// Connection endpoint, typically `host:port`
    pub address: String,
    /// Time of the most recent register or heartbeat
    pub last_heartbeat: DateTime<Utc>,
}

impl InstanceRecord {
    pub fn new(address: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            address: address.into(),
            last_heartbeat: now,
        }
    }

    /// Time elapsed since the last heartbeat.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.last_heartbeat
    }

    /// A record is fresh while its age is strictly below the window.
    /// A heartbeat stamped after `now` (clock stepped back) counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match self.age(now).to_std() {
            Ok(age) => age < window,
            Err(_) => true,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_heartbeat = now;
    }
}

/// Point-in-time copy of a record, handed out by listing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    pub service: ServiceName,
    pub instance: InstanceId,
    pub address: String,
    pub last_heartbeat: DateTime<Utc>,
    pub fresh: bool,
}
