//! Token Storage
//!
//! Persistence seam for the signed-in session's token. Durable credential
//! storage (keychain, secure enclave, ...) implements [`TokenStore`]; this
//! crate ships an in-memory store.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;
use crate::types::StoredToken;

/// Token storage interface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Replace the stored token.
    async fn store(&self, token: StoredToken) -> Result<(), StorageError>;

    /// Current token, if any.
    async fn load(&self) -> Result<Option<StoredToken>, StorageError>;

    /// Forget the stored token.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory token storage implementation.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<StoredToken>>,
}

impl InMemoryTokenStore {
    /// Create new in-memory token storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage holding `token`.
    pub fn with_token(token: StoredToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn store(&self, token: StoredToken) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    async fn load(&self) -> Result<Option<StoredToken>, StorageError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenInfo;

    fn token(access: &str) -> StoredToken {
        StoredToken::from_token_info(&TokenInfo {
            access_token: access.to_string(),
            expires_in: 3600,
            refresh_token: format!("{}-refresh", access),
        })
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let store = InMemoryTokenStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.store(token("first")).await.unwrap();
        store.store(token("second")).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.access_token, "second");
        assert_eq!(loaded.refresh_token, "second-refresh");
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryTokenStore::with_token(token("t"));
        assert!(store.load().await.unwrap().is_some());

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
