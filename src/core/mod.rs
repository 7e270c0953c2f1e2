//! Core Components
//!
//! Transport, resource compilation, parameter encoding, response decoding and
//! the token-refresh hook.

pub mod decoding;
pub mod encoding;
pub mod interceptor;
pub mod resource;
pub mod transport;

pub use decoding::*;
pub use encoding::*;
pub use interceptor::*;
pub use resource::*;
pub use transport::*;
