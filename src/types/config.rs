//! Configuration Types
//!
//! Service environment and identity client configuration.

use secrecy::SecretString;
use std::fmt;
use std::time::Duration;

use crate::telemetry::NetworkingLogLevel;

/// Default identity token endpoint.
pub const DEFAULT_IDENTITY_URL: &str = "https://auth.crooti.com/connect/token";

/// Deployment environment and its API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkEnvironment {
    Testing(String),
    Production(String),
    Dev(String),
}

impl NetworkEnvironment {
    /// Base URL resources are resolved against.
    pub fn url(&self) -> &str {
        match self {
            Self::Testing(url) | Self::Production(url) | Self::Dev(url) => url,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Testing(_) => "testing",
            Self::Production(_) => "production",
            Self::Dev(_) => "dev",
        }
    }
}

/// Identity client registration sent with token requests.
#[derive(Clone)]
pub struct ClientIdentity {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Grant type used for password sign-in.
    pub grant_type: String,
    /// Grant type used when exchanging a refresh token.
    pub refresh_grant_type: String,
    pub scope: String,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            client_id: "crooti".to_string(),
            client_secret: SecretString::new("secret".to_string()),
            grant_type: "custom".to_string(),
            refresh_grant_type: "refresh_token".to_string(),
            scope: "crooti_api offline_access".to_string(),
        }
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("grant_type", &self.grant_type)
            .field("refresh_grant_type", &self.refresh_grant_type)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Service configuration.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub environment: NetworkEnvironment,
    /// Absolute token endpoint of the identity server.
    pub identity_url: String,
    pub identity: ClientIdentity,
    /// Transport timeout per attempt.
    pub timeout: Duration,
    /// Maximum token refreshes per call.
    pub retry_limit: u32,
    pub log_level: NetworkingLogLevel,
    /// Install a token-refresh interceptor on the shared repository.
    pub auto_refresh: bool,
}

impl ServiceConfig {
    pub fn base_url(&self) -> &str {
        self.environment.url()
    }
}
