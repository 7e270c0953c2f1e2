//! Repositories
//!
//! The shared execution engine and the feature repositories built on it.

pub mod auth;
pub mod web;

pub use auth::{AuthApi, AuthRepository, AuthRepositoryImpl, FORGOT_PASSWORD_PATH, REGISTER_PATH};
pub use web::{ExecuteOptions, WebRepository};
