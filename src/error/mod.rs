//! Repository Error Types
//!
//! Error hierarchy for resource compilation, transport, token refresh and
//! response classification.
//!
//! [`NetworkError`] is the closed taxonomy every execution ends in. It keeps
//! the raw body of unexpected HTTP statuses so callers can run a second,
//! domain-specific decode on demand (see [`ResponseError`]).

use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::types::HttpCode;

/// Root error type for repository operations.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("{0}")]
    Network(#[from] NetworkError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Token refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl RepositoryError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "REPOSITORY_NETWORK",
            Self::Transport(_) => "REPOSITORY_TRANSPORT",
            Self::Refresh(_) => "REPOSITORY_REFRESH",
            Self::Storage(_) => "REPOSITORY_STORAGE",
            Self::Configuration(_) => "REPOSITORY_CONFIG",
        }
    }

    /// Get the classified network error, if this is one.
    pub fn network_error(&self) -> Option<&NetworkError> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }

    /// Check if the failure happened before any status was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if error requires the user to authenticate again.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::Network(NetworkError::Unauthorized) => true,
            Self::Network(NetworkError::Forbidden) => true,
            Self::Refresh(RefreshError::NoRefreshToken) => true,
            Self::Refresh(RefreshError::Rejected { .. }) => true,
            _ => false,
        }
    }

    /// Decode the body of an `HttpStatus` failure into a domain error type.
    ///
    /// Returns `None` for every other error kind and for bodies that do not
    /// match `T`.
    pub fn custom_error<T: ResponseError>(&self) -> Option<T> {
        self.network_error().and_then(|e| e.http_model())
    }
}

/// Classified outcome of a failed request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("The request gave no data.")]
    NoData,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Failed to encode parameters: {0}")]
    EncodingFailure(String),

    #[error("Unexpected HTTP code: {code}")]
    HttpStatus { code: HttpCode, body: Bytes },

    #[error("Failed to map data to a Decodable object. {0}")]
    DecodingFailure(String),

    #[error("Unexpected response from the server")]
    UnexpectedResponse,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden (not authorized)")]
    Forbidden,
}

impl NetworkError {
    /// Decode the raw body carried by `HttpStatus` into `T`.
    pub fn http_model<T: ResponseError>(&self) -> Option<T> {
        match self {
            Self::HttpStatus { body, .. } => T::from_data(body).ok(),
            _ => None,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<HttpCode> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            _ => None,
        }
    }
}

/// Domain error payload that can be decoded from a failure response body.
///
/// ```rust,ignore
/// #[derive(serde::Deserialize)]
/// struct ApiFailure { message: String }
///
/// impl ResponseError for ApiFailure {}
///
/// let failure: Option<ApiFailure> = error.custom_error();
/// ```
pub trait ResponseError: DeserializeOwned {
    /// Decode from raw response bytes.
    fn from_data(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// Transport failure before a response status was obtained.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Failed to read response body: {message}")]
    BodyRead { message: String },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

impl TransportError {
    /// Check if the transport gave up because of its own timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Token refresh failure reported by a request interceptor.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Refresh rejected: {message}")]
    Rejected { message: String },

    #[error("Token storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Refresh request failed: {0}")]
    Request(Box<RepositoryError>),
}

impl From<RepositoryError> for RefreshError {
    fn from(error: RepositoryError) -> Self {
        Self::Request(Box::new(error))
    }
}

/// Token store failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Stored token is unreadable: {message}")]
    Corrupted { message: String },
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
