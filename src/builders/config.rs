//! Configuration Builder
//!
//! Fluent builder for service configuration.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::error::{ConfigurationError, RepositoryError};
use crate::telemetry::NetworkingLogLevel;
use crate::types::{ClientIdentity, NetworkEnvironment, ServiceConfig, DEFAULT_IDENTITY_URL};

/// Service configuration builder.
#[derive(Default)]
pub struct ServiceConfigBuilder {
    environment: Option<NetworkEnvironment>,
    identity_url: Option<String>,
    identity: ClientIdentity,
    timeout: Duration,
    retry_limit: u32,
    log_level: NetworkingLogLevel,
    auto_refresh: bool,
}

impl ServiceConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_limit: 1,
            auto_refresh: true,
            ..Default::default()
        }
    }

    /// Set environment.
    pub fn environment(mut self, environment: NetworkEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Use a testing environment at `url`.
    pub fn testing(self, url: impl Into<String>) -> Self {
        self.environment(NetworkEnvironment::Testing(url.into()))
    }

    /// Use a production environment at `url`.
    pub fn production(self, url: impl Into<String>) -> Self {
        self.environment(NetworkEnvironment::Production(url.into()))
    }

    /// Use a development environment at `url`.
    pub fn dev(self, url: impl Into<String>) -> Self {
        self.environment(NetworkEnvironment::Dev(url.into()))
    }

    /// Set identity token endpoint.
    pub fn identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = Some(url.into());
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.identity.client_id = client_id.into();
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.identity.client_secret = SecretString::new(client_secret.into());
        self
    }

    /// Set sign-in grant type.
    pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.identity.grant_type = grant_type.into();
        self
    }

    /// Set refresh grant type.
    pub fn refresh_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.identity.refresh_grant_type = grant_type.into();
        self
    }

    /// Set requested scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.identity.scope = scope.into();
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many token refreshes a single call may trigger.
    pub fn retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// Set default request/response log level.
    pub fn log_level(mut self, level: NetworkingLogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Enable or disable the token-refresh interceptor.
    pub fn auto_refresh(mut self, enable: bool) -> Self {
        self.auto_refresh = enable;
        self
    }

    /// Build the service configuration.
    pub fn build(self) -> Result<ServiceConfig, RepositoryError> {
        let environment = self.environment.ok_or_else(|| {
            RepositoryError::Configuration(ConfigurationError::MissingRequired {
                field: "environment".to_string(),
            })
        })?;

        validate_url(environment.url())?;

        let identity_url = self
            .identity_url
            .unwrap_or_else(|| DEFAULT_IDENTITY_URL.to_string());
        validate_url(&identity_url)?;

        if self.identity.client_id.is_empty() {
            return Err(RepositoryError::Configuration(
                ConfigurationError::MissingRequired {
                    field: "client_id".to_string(),
                },
            ));
        }

        if self.timeout.is_zero() {
            return Err(RepositoryError::Configuration(
                ConfigurationError::InvalidConfig {
                    message: "timeout must be greater than zero".to_string(),
                },
            ));
        }

        Ok(ServiceConfig {
            environment,
            identity_url,
            identity: self.identity,
            timeout: self.timeout,
            retry_limit: self.retry_limit,
            log_level: self.log_level,
            auto_refresh: self.auto_refresh,
        })
    }
}

fn validate_url(url: &str) -> Result<(), RepositoryError> {
    Url::parse(url).map(|_| ()).map_err(|_| {
        RepositoryError::Configuration(ConfigurationError::InvalidEndpoint {
            url: url.to_string(),
        })
    })
}

/// Create a new service configuration builder.
pub fn service_config() -> ServiceConfigBuilder {
    ServiceConfigBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_builder_success() {
        let config = ServiceConfigBuilder::new()
            .production("https://api.example.com")
            .client_id("mobile")
            .client_secret("s3cret")
            .scope("api offline_access")
            .retry_limit(2)
            .log_level(NetworkingLogLevel::Debug)
            .build()
            .unwrap();

        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(config.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.identity.client_id, "mobile");
        assert_eq!(config.identity.client_secret.expose_secret(), "s3cret");
        assert_eq!(config.retry_limit, 2);
        assert_eq!(config.log_level, NetworkingLogLevel::Debug);
    }

    #[test]
    fn test_builder_defaults() {
        let config = service_config().dev("https://dev.example.com").build().unwrap();

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_limit, 1);
        assert_eq!(config.log_level, NetworkingLogLevel::Off);
        assert!(config.auto_refresh);
        assert_eq!(config.identity.client_id, "crooti");
        assert_eq!(config.identity.grant_type, "custom");
        assert_eq!(config.identity.refresh_grant_type, "refresh_token");
    }

    #[test]
    fn test_builder_missing_environment() {
        let result = ServiceConfigBuilder::new().build();
        assert!(matches!(
            result,
            Err(RepositoryError::Configuration(
                ConfigurationError::MissingRequired { .. }
            ))
        ));
    }

    #[test]
    fn test_builder_invalid_base_url() {
        let result = ServiceConfigBuilder::new().testing("not a url").build();
        assert!(matches!(
            result,
            Err(RepositoryError::Configuration(
                ConfigurationError::InvalidEndpoint { .. }
            ))
        ));
    }

    #[test]
    fn test_builder_invalid_identity_url() {
        let result = ServiceConfigBuilder::new()
            .testing("https://api.example.com")
            .identity_url("/connect/token")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_zero_timeout() {
        let result = ServiceConfigBuilder::new()
            .testing("https://api.example.com")
            .timeout(Duration::ZERO)
            .build();
        assert!(matches!(
            result,
            Err(RepositoryError::Configuration(
                ConfigurationError::InvalidConfig { .. }
            ))
        ));
    }
}
