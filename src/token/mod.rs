//! Token Management
//!
//! Token persistence and the refresh interceptor.

pub mod refresh;
pub mod storage;

pub use refresh::TokenRefreshInterceptor;
pub use storage::{InMemoryTokenStore, TokenStore};
