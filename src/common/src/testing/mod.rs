//! Test utilities for waypoint.
//!
//! Only available with the `testing` feature or during tests:
//!
//! ```toml
//! [dev-dependencies]
//! common = { path = "../common", features = ["testing"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use common::testing::TestConfigBuilder;
//! use std::time::Duration;
//!
//! let config = TestConfigBuilder::new()
//!     .with_freshness_window(Duration::from_secs(2))
//!     .build();
//! ```

mod config_builder;

pub use config_builder::TestConfigBuilder;
