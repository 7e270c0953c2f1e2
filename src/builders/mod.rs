//! Builders
//!
//! Fluent builder for service configuration.

pub mod config;

pub use config::{service_config, ServiceConfigBuilder};
