//! Auth Repository
//!
//! Sign-in, token refresh, registration and password reset against the
//! identity service and the account API.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

use super::web::{ExecuteOptions, WebRepository};
use crate::core::{Resource, SessionOutput};
use crate::error::{NetworkError, RepositoryResult};
use crate::telemetry::NetworkingLogLevel;
use crate::token::TokenStore;
use crate::types::{
    ClientIdentity, Endpoint, HttpHeaders, HttpTask, ParameterValue, Parameters, StoredToken,
    TokenInfo, UserInfo,
};

/// Registration path on the account API.
pub const REGISTER_PATH: &str = "/account/register";

/// Password reset path on the account API.
pub const FORGOT_PASSWORD_PATH: &str = "/account/forgotPassword";

/// Authentication operations.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Exchange credentials for a token and store it.
    async fn sign_in(&self, email: &str, password: &SecretString) -> RepositoryResult<TokenInfo>;

    /// Exchange a refresh token for a new token and store it.
    async fn refresh_token(&self, refresh_token: &str) -> RepositoryResult<TokenInfo>;

    /// Register a new account.
    async fn sign_up(&self, user: &UserInfo) -> RepositoryResult<UserInfo>;

    /// Start a password reset for `login`.
    async fn forgot_password(&self, login: &str) -> RepositoryResult<SessionOutput>;
}

/// Auth API resources.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthApi {
    SignIn {
        identity_url: String,
        parameters: Parameters,
    },
    RefreshToken {
        identity_url: String,
        parameters: Parameters,
    },
    SignUp {
        parameters: Parameters,
        bearer: Option<String>,
    },
    ForgotPassword {
        parameters: Parameters,
        bearer: Option<String>,
    },
}

impl Resource for AuthApi {
    fn endpoint(&self) -> Endpoint {
        match self {
            Self::SignIn { identity_url, .. } | Self::RefreshToken { identity_url, .. } => {
                Endpoint::post(identity_url.clone())
            }
            Self::SignUp { .. } => Endpoint::post(REGISTER_PATH),
            Self::ForgotPassword { .. } => Endpoint::post(FORGOT_PASSWORD_PATH),
        }
    }

    fn task(&self) -> HttpTask {
        match self {
            Self::SignIn { parameters, .. } | Self::RefreshToken { parameters, .. } => {
                HttpTask::url_parameters(parameters.clone())
            }
            Self::SignUp { parameters, .. } | Self::ForgotPassword { parameters, .. } => {
                HttpTask::json_body(parameters.clone())
            }
        }
    }

    fn headers(&self) -> Option<HttpHeaders> {
        match self {
            Self::SignUp { bearer, .. } | Self::ForgotPassword { bearer, .. } => {
                bearer.as_ref().map(|value| {
                    let mut headers = HttpHeaders::new();
                    headers.insert(AUTHORIZATION.as_str().to_string(), value.clone());
                    headers
                })
            }
            _ => None,
        }
    }
}

/// Auth repository backed by a [`WebRepository`].
#[derive(Clone)]
pub struct AuthRepositoryImpl {
    web: WebRepository,
    identity_url: String,
    identity: ClientIdentity,
    token_store: Arc<dyn TokenStore>,
}

impl AuthRepositoryImpl {
    pub fn new(
        web: WebRepository,
        identity_url: impl Into<String>,
        identity: ClientIdentity,
        token_store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            web,
            identity_url: identity_url.into(),
            identity,
            token_store,
        }
    }

    fn identity_parameters(&self, grant_type: &str) -> Parameters {
        let mut parameters = Parameters::new();
        parameters.insert("client_id".to_string(), self.identity.client_id.as_str().into());
        parameters.insert(
            "client_secret".to_string(),
            self.identity.client_secret.expose_secret().as_str().into(),
        );
        parameters.insert("grant_type".to_string(), grant_type.into());
        parameters
    }

    async fn bearer(&self) -> RepositoryResult<Option<String>> {
        Ok(self.token_store.load().await?.map(|token| token.bearer()))
    }

    async fn request_token(&self, resource: AuthApi) -> RepositoryResult<TokenInfo> {
        let options = ExecuteOptions::new()
            .full_path(true)
            .log_level(NetworkingLogLevel::Debug);
        let token: TokenInfo = self.web.execute_json(&resource, options).await?;
        self.token_store
            .store(StoredToken::from_token_info(&token))
            .await?;
        Ok(token)
    }
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn sign_in(&self, email: &str, password: &SecretString) -> RepositoryResult<TokenInfo> {
        let mut parameters = self.identity_parameters(&self.identity.grant_type);
        parameters.insert("scope".to_string(), self.identity.scope.as_str().into());
        parameters.insert("username".to_string(), email.into());
        parameters.insert("password".to_string(), password.expose_secret().as_str().into());

        debug!(client_id = %self.identity.client_id, "Signing in");
        self.request_token(AuthApi::SignIn {
            identity_url: self.identity_url.clone(),
            parameters,
        })
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> RepositoryResult<TokenInfo> {
        let mut parameters = self.identity_parameters(&self.identity.refresh_grant_type);
        parameters.insert("refresh_token".to_string(), refresh_token.into());

        debug!(client_id = %self.identity.client_id, "Refreshing token");
        self.request_token(AuthApi::RefreshToken {
            identity_url: self.identity_url.clone(),
            parameters,
        })
        .await
    }

    async fn sign_up(&self, user: &UserInfo) -> RepositoryResult<UserInfo> {
        let parameters = match serde_json::to_value(user) {
            Ok(serde_json::Value::Object(fields)) => fields
                .into_iter()
                .map(|(key, value)| (key, ParameterValue::Json(value)))
                .collect(),
            Ok(_) => {
                return Err(NetworkError::EncodingFailure(
                    "user info is not a JSON object".to_string(),
                )
                .into())
            }
            Err(e) => return Err(NetworkError::EncodingFailure(e.to_string()).into()),
        };

        let resource = AuthApi::SignUp {
            parameters,
            bearer: self.bearer().await?,
        };
        self.web
            .execute_json(
                &resource,
                ExecuteOptions::new().log_level(NetworkingLogLevel::Debug),
            )
            .await
    }

    async fn forgot_password(&self, login: &str) -> RepositoryResult<SessionOutput> {
        let mut parameters = Parameters::new();
        parameters.insert("email".to_string(), login.into());

        let resource = AuthApi::ForgotPassword {
            parameters,
            bearer: self.bearer().await?,
        };
        self.web
            .execute(
                &resource,
                ExecuteOptions::new().log_level(NetworkingLogLevel::Debug),
            )
            .await
    }
}
