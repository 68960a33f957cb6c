pub mod config;
pub mod logging;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::Configuration;
