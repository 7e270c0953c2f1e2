//! Repository Types
//!
//! Resource vocabulary, parameters, configuration and identity models.

pub mod codable;
pub mod config;
pub mod http;
pub mod models;
pub mod parameters;

pub use codable::*;
pub use config::*;
pub use http::*;
pub use models::*;
pub use parameters::*;
