//! Token Refresh
//!
//! Request interceptor that renews the stored token through the identity
//! service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::TokenStore;
use crate::core::RequestInterceptor;
use crate::error::{NetworkError, RefreshError, RepositoryError};
use crate::repository::AuthRepository;

/// Refreshes the stored token with its refresh token.
///
/// The auth repository it calls must not itself carry this interceptor, or
/// an unauthorized refresh would trigger another refresh.
pub struct TokenRefreshInterceptor {
    auth: Arc<dyn AuthRepository>,
    token_store: Arc<dyn TokenStore>,
}

impl TokenRefreshInterceptor {
    pub fn new(auth: Arc<dyn AuthRepository>, token_store: Arc<dyn TokenStore>) -> Self {
        Self { auth, token_store }
    }
}

#[async_trait]
impl RequestInterceptor for TokenRefreshInterceptor {
    async fn refresh_token(&self) -> Result<(), RefreshError> {
        let stored = self
            .token_store
            .load()
            .await?
            .ok_or(RefreshError::NoRefreshToken)?;

        if stored.refresh_token.is_empty() {
            return Err(RefreshError::NoRefreshToken);
        }

        debug!(expires_at = %stored.expires_at, "Refreshing stored token");
        match self.auth.refresh_token(&stored.refresh_token).await {
            Ok(_) => Ok(()),
            Err(error) => {
                warn!(error = %error, "Token refresh failed");
                Err(classify_failure(error))
            }
        }
    }
}

fn classify_failure(error: RepositoryError) -> RefreshError {
    match error {
        RepositoryError::Network(
            network @ (NetworkError::Unauthorized
            | NetworkError::Forbidden
            | NetworkError::HttpStatus { code: 400, .. }),
        ) => RefreshError::Rejected {
            message: network.to_string(),
        },
        RepositoryError::Storage(storage) => RefreshError::Storage(storage),
        other => other.into(),
    }
}
