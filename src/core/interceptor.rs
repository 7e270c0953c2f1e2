//! Request Interceptor
//!
//! Token-refresh hook invoked by the execution engine after a 401 or 403.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::RefreshError;

/// Refreshes credentials before an unauthorized request is retried.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Obtain fresh credentials. Failures end the current call.
    async fn refresh_token(&self) -> Result<(), RefreshError>;
}

/// Mock interceptor for testing.
#[derive(Default)]
pub struct MockRequestInterceptor {
    calls: AtomicUsize,
    failures: Mutex<VecDeque<RefreshError>>,
    hang: AtomicBool,
}

impl MockRequestInterceptor {
    /// Create new mock interceptor that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next refresh with `error`.
    pub fn queue_failure(&self, error: RefreshError) -> &Self {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(error);
        self
    }

    /// Never complete refreshes while set.
    pub fn set_hanging(&self, hang: bool) -> &Self {
        self.hang.store(hang, Ordering::SeqCst);
        self
    }

    /// Number of refreshes started.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestInterceptor for MockRequestInterceptor {
    async fn refresh_token(&self) -> Result<(), RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        match self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
