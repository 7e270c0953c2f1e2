//! Typed Web Repositories
//!
//! Request execution pipeline for typed network services: declarative
//! resources compile to HTTP requests, get dispatched, retried once after a
//! token refresh on 401/403, classified and decoded.
//!
//! # Features
//!
//! - Declarative endpoints (`Endpoint`, `HttpTask`, `Resource`)
//! - Query-string and JSON-body parameter encoding
//! - Retry-with-refresh on authorization failures
//! - Closed error taxonomy with on-demand domain error decoding
//! - Request/response logging at `Off`, `Info` or `Debug`
//! - Auth repository for the identity service
//!
//! # Example
//!
//! ```rust,ignore
//! use cf_repositories::{service_config, RepositoryClient, AuthRepository};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = service_config()
//!         .production("https://api.crooti.com")
//!         .build()?;
//!
//!     let client = RepositoryClient::new(config)?;
//!
//!     let password = SecretString::new("hunter2".to_string());
//!     let token = client.auth().sign_in("jane@example.com", &password).await?;
//!     println!("Signed in, token expires in {}s", token.expires_in);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: endpoints, tasks, parameters, configuration and identity models
//! - `error`: error hierarchy and the `NetworkError` taxonomy
//! - `core`: transport, resource compilation, encoders, decoders, interceptor seam
//! - `telemetry`: request/response logging
//! - `repository`: the `WebRepository` engine and the auth repository
//! - `token`: token storage and the refresh interceptor
//! - `builders`: fluent configuration builder
//! - `client`: facade wiring everything together

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod repository;
pub mod telemetry;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{repository_client, RepositoryClient};

// Re-export builders
pub use builders::{service_config, ServiceConfigBuilder};

// Re-export errors
pub use error::{
    ConfigurationError, NetworkError, RefreshError, RepositoryError, RepositoryResult,
    ResponseError, StorageError, TransportError,
};

// Re-export types
pub use types::{
    parameters, CachePolicy, ClientIdentity, DefaultCodable, DefaultEmpty, DefaultFalse,
    DefaultValueProvider, DefaultZero, EmptyValue, Endpoint, False, HttpCode, HttpCodes,
    HttpHeaders, HttpMethod, HttpTask, NetworkEnvironment, ParameterEncoding, ParameterValue,
    Parameters, ServiceConfig, StoredToken, TokenInfo, UserInfo, Zero, DEFAULT_IDENTITY_URL,
    SUCCESS_CODES,
};

// Re-export core components
pub use crate::core::{
    // Transport
    HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
    SessionOutput,
    // Resources
    Resource, ResourceDescriptor,
    // Encoding
    EncodingError, JsonParameterEncoder, ParameterEncoder, UrlParameterEncoder,
    // Decoding
    decode_json, ResponseDecoder, SliceDecoder, ValueDecoder,
    // Interceptor
    MockRequestInterceptor, RequestInterceptor,
};

// Re-export repositories
pub use repository::{AuthApi, AuthRepository, AuthRepositoryImpl, ExecuteOptions, WebRepository};

// Re-export token management
pub use token::{InMemoryTokenStore, TokenRefreshInterceptor, TokenStore};

// Re-export telemetry
pub use telemetry::{
    InMemoryLogger, LogEntry, LogEntryKind, NetworkingLogLevel, NetworkingLogger, NoOpLogger,
    TracingLogger, REDACTED_QUERY_KEYS,
};
