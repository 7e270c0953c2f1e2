//! Identity Models
//!
//! Token and user payloads exchanged with the identity service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::codable::{DefaultEmpty, DefaultFalse, DefaultZero};

/// Token response from the identity endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub refresh_token: String,
}

/// Token with the time it was stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub stored_at: DateTime<Utc>,
}

impl StoredToken {
    /// Stamp a token response with the current time.
    pub fn from_token_info(info: &TokenInfo) -> Self {
        let now = Utc::now();
        Self {
            access_token: info.access_token.clone(),
            refresh_token: info.refresh_token.clone(),
            expires_at: now + Duration::seconds(info.expires_in),
            stored_at: now,
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Check if token expires within `threshold_secs`.
    pub fn is_expiring_soon(&self, threshold_secs: i64) -> bool {
        self.expires_at <= Utc::now() + Duration::seconds(threshold_secs)
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Account profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    #[serde(default)]
    pub first_name: DefaultEmpty<String>,
    #[serde(default)]
    pub last_name: DefaultEmpty<String>,
    #[serde(default)]
    pub username: DefaultEmpty<String>,
    #[serde(default)]
    pub user_image_link: DefaultEmpty<String>,
    #[serde(default)]
    pub email_confirmed: DefaultFalse,
    #[serde(default)]
    pub number_of_shares: DefaultZero,
    #[serde(default)]
    pub number_of_favourites: DefaultZero,
    #[serde(default)]
    pub phone_number_confirmed: DefaultFalse,
    #[serde(default)]
    pub phone_number: DefaultEmpty<String>,
    #[serde(default)]
    pub registered_on: DefaultEmpty<String>,
    #[serde(default)]
    pub allow_login: DefaultFalse,
    #[serde(default)]
    pub enable_push_notifications: DefaultFalse,
}

impl UserInfo {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }
}
