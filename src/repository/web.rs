//! Web Repository
//!
//! Execution engine shared by every feature repository.
//!
//! A call moves through attempts. Each attempt compiles the resource,
//! dispatches it once and classifies the status:
//!
//! 1. a status outside `100..=599` is `UnexpectedResponse`
//! 2. 401/403 with an interceptor and refreshes left runs the refresh hook and
//!    starts the next attempt
//! 3. 401/403 otherwise is `Unauthorized`/`Forbidden`
//! 4. any other status outside the success range is `HttpStatus` with the body
//! 5. anything else succeeds
//!
//! Refresh failures end the call. Dropping the returned future cancels the
//! call at its current await point and no further attempt is made.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::{
    decode_json, HttpTransport, RequestInterceptor, Resource, SessionOutput,
};
use crate::error::{NetworkError, RepositoryResult};
use crate::telemetry::{NetworkingLogLevel, NetworkingLogger, TracingLogger};
use crate::types::{HttpCode, HttpCodes, SUCCESS_CODES};

/// Per-call execution options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Statuses treated as success.
    pub success_codes: HttpCodes,
    /// Use the endpoint path as the absolute URL.
    pub full_path: bool,
    pub log_level: NetworkingLogLevel,
    /// Attempt number the call starts at.
    pub retry_iteration: u32,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            success_codes: SUCCESS_CODES,
            full_path: false,
            log_level: NetworkingLogLevel::Off,
            retry_iteration: 0,
        }
    }
}

impl ExecuteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_codes(mut self, codes: HttpCodes) -> Self {
        self.success_codes = codes;
        self
    }

    pub fn full_path(mut self, full_path: bool) -> Self {
        self.full_path = full_path;
        self
    }

    pub fn log_level(mut self, level: NetworkingLogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn retry_iteration(mut self, iteration: u32) -> Self {
        self.retry_iteration = iteration;
        self
    }
}

/// Compiles, dispatches, retries and classifies resource calls.
#[derive(Clone)]
pub struct WebRepository {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    logger: Arc<dyn NetworkingLogger>,
    retry_limit: u32,
    timeout: Option<Duration>,
}

impl WebRepository {
    /// Create a repository with the tracing logger, no interceptor and a
    /// retry limit of 1.
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            interceptor: None,
            logger: Arc::new(TracingLogger::new()),
            retry_limit: 1,
            timeout: None,
        }
    }

    /// Install the token-refresh hook.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn NetworkingLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Maximum refreshes per call.
    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// Timeout stamped on every compiled request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    pub fn has_interceptor(&self) -> bool {
        self.interceptor.is_some()
    }

    /// Execute a resource and return the raw response.
    pub async fn execute(
        &self,
        resource: &dyn Resource,
        options: ExecuteOptions,
    ) -> RepositoryResult<SessionOutput> {
        let mut attempt = options.retry_iteration;

        loop {
            let mut request = if options.full_path {
                resource.full_path_request()?
            } else {
                resource.url_request(&self.base_url)?
            };
            if request.timeout.is_none() {
                request.timeout = self.timeout;
            }

            self.logger.log_request(&request, options.log_level);
            debug!(method = %request.method, url = %request.url, attempt, "Dispatching request");

            let response = self.transport.send(request.clone()).await?;
            self.logger
                .log_response(&request, &response, options.log_level);

            let status = response.status;
            if !is_usable_status(status) {
                warn!(status, url = %request.url, "Response without a usable status");
                return Err(NetworkError::UnexpectedResponse.into());
            }

            if status == 401 || status == 403 {
                if let Some(interceptor) = &self.interceptor {
                    if attempt < self.retry_limit {
                        debug!(status, attempt, "Refreshing token before retry");
                        interceptor.refresh_token().await?;
                        attempt += 1;
                        continue;
                    }
                }

                warn!(status, attempt, url = %request.url, "Authorization failed");
                return Err(if status == 401 {
                    NetworkError::Unauthorized.into()
                } else {
                    NetworkError::Forbidden.into()
                });
            }

            if !options.success_codes.contains(&status) {
                debug!(status, url = %request.url, "Unexpected status");
                return Err(NetworkError::HttpStatus {
                    code: status,
                    body: response.body,
                }
                .into());
            }

            return Ok(response);
        }
    }

    /// Execute a resource and decode the JSON body into `T`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        resource: &dyn Resource,
        options: ExecuteOptions,
    ) -> RepositoryResult<T> {
        let output = self.execute(resource, options).await?;
        Ok(decode_json(&output.body)?)
    }
}

impl std::fmt::Debug for WebRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebRepository")
            .field("base_url", &self.base_url)
            .field("has_interceptor", &self.interceptor.is_some())
            .field("retry_limit", &self.retry_limit)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn is_usable_status(status: HttpCode) -> bool {
    (100..=599).contains(&status)
}
