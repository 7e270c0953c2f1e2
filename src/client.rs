//! Repository Client
//!
//! High-level client that wires configuration, transport, token storage and
//! logging into the shared web repository and hands out feature repositories.

use std::sync::Arc;

use crate::core::{
    HttpTransport, ReqwestHttpTransport, RequestInterceptor, Resource, SessionOutput,
};
use crate::error::RepositoryResult;
use crate::repository::{AuthRepositoryImpl, ExecuteOptions, WebRepository};
use crate::telemetry::{NetworkingLogger, TracingLogger};
use crate::token::{InMemoryTokenStore, TokenRefreshInterceptor, TokenStore};
use crate::types::ServiceConfig;

/// Entry point for repository access.
pub struct RepositoryClient {
    config: ServiceConfig,
    web: WebRepository,
    identity_web: WebRepository,
    token_store: Arc<dyn TokenStore>,
}

impl RepositoryClient {
    /// Create a client with the reqwest transport, an in-memory token store
    /// and the tracing logger.
    pub fn new(config: ServiceConfig) -> RepositoryResult<Self> {
        let transport = Arc::new(ReqwestHttpTransport::with_timeout(config.timeout)?);
        Ok(Self::with_components(
            config,
            transport,
            Arc::new(InMemoryTokenStore::new()),
            Arc::new(TracingLogger::new()),
        ))
    }

    /// Create a client with custom implementations.
    pub fn with_components(
        config: ServiceConfig,
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
        logger: Arc<dyn NetworkingLogger>,
    ) -> Self {
        let identity_web = WebRepository::new(config.base_url(), transport)
            .with_logger(logger)
            .with_retry_limit(config.retry_limit)
            .with_timeout(config.timeout);

        let mut web = identity_web.clone();
        if config.auto_refresh {
            let refresher = AuthRepositoryImpl::new(
                identity_web.clone(),
                config.identity_url.clone(),
                config.identity.clone(),
                token_store.clone(),
            );
            web = web.with_interceptor(Arc::new(TokenRefreshInterceptor::new(
                Arc::new(refresher),
                token_store.clone(),
            )));
        }

        Self {
            config,
            web,
            identity_web,
            token_store,
        }
    }

    /// Replace the refresh hook on the shared repository.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.web = self.identity_web.clone().with_interceptor(interceptor);
        self
    }

    /// Get the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Shared web repository for feature repositories.
    pub fn web(&self) -> &WebRepository {
        &self.web
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        self.token_store.clone()
    }

    /// Auth repository on the shared web repository.
    pub fn auth(&self) -> AuthRepositoryImpl {
        AuthRepositoryImpl::new(
            self.web.clone(),
            self.config.identity_url.clone(),
            self.config.identity.clone(),
            self.token_store.clone(),
        )
    }

    /// Options carrying the configured default log level.
    pub fn default_options(&self) -> ExecuteOptions {
        ExecuteOptions::new().log_level(self.config.log_level)
    }

    /// Execute an ad-hoc resource with the default options.
    pub async fn execute(&self, resource: &dyn Resource) -> RepositoryResult<SessionOutput> {
        self.web.execute(resource, self.default_options()).await
    }

    /// Forget the stored token.
    pub async fn sign_out(&self) -> RepositoryResult<()> {
        self.token_store.clear().await?;
        Ok(())
    }
}

/// Create a repository client with default components.
pub fn repository_client(config: ServiceConfig) -> RepositoryResult<RepositoryClient> {
    RepositoryClient::new(config)
}
