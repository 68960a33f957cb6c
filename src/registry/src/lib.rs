//! In-memory service discovery registry.
//!
//! Service instances [`register`](Registry::register) their address under a
//! logical service name, keep themselves alive with
//! [`heartbeat`](Registry::heartbeat), and callers
//! [`resolve`](Registry::resolve) a name to the addresses of instances whose
//! last heartbeat falls inside the freshness window.
//!
//! ```rust
//! use registry::{InstanceId, Registry, ServiceName};
//!
//! let registry = Registry::new();
//! let movies = ServiceName::new("movies")?;
//! let instance = InstanceId::new("i1")?;
//!
//! registry.register(&movies, &instance, "10.0.0.1:8080");
//! assert_eq!(registry.resolve(&movies)?, vec!["10.0.0.1:8080".to_string()]);
//!
//! registry.deregister(&movies, &instance);
//! assert!(registry.resolve(&movies).unwrap_err().is_not_found());
//! # Ok::<(), registry::RegistryError>(())
//! ```

pub mod clock;
pub mod discovery;
pub mod error;
pub mod instance;
pub mod registry;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use discovery::Discovery;
pub use error::{MissingRecord, RegistryError, Result};
pub use instance::{InstanceId, InstanceRecord, InstanceSnapshot, ServiceName};
pub use common::config::DEFAULT_FRESHNESS_WINDOW;
pub use registry::Registry;
pub use sweeper::Sweeper;
