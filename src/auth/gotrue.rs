use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::config::StoreConfig;

use super::{AuthError, AuthOutcome, AuthProvider, AuthUser, SessionTokens};

/// GoTrue-backed auth provider client. Shares the BaaS project's base URL and
/// anon key with the store client.
pub struct GoTrueProvider {
    http: reqwest::Client,
    auth_base: Url,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: Uuid,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    refresh_token: String,
    user: UserBody,
}

impl GoTrueProvider {
    pub fn new(config: &StoreConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let auth_base = Url::parse(&config.base_url)
            .and_then(|base| base.join("auth/v1/"))
            .map_err(|_| AuthError::Provider(format!("invalid base URL: {}", config.base_url)))?;

        Ok(Self {
            http,
            auth_base,
            anon_key: config.anon_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.auth_base
            .join(path)
            .map_err(|_| AuthError::Provider(format!("invalid auth endpoint: {}", path)))
    }

    async fn fetch_user(&self, access_token: &str) -> Result<reqwest::Response, AuthError> {
        let response = self
            .http
            .get(self.endpoint("user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        Ok(response)
    }

    /// Exchange the refresh token for a new pair. Used when the access token
    /// has expired; a rejection here means the whole session is dead.
    async fn refresh_session(&self, refresh_token: &str) -> Result<TokenBody, AuthError> {
        let response = self
            .http
            .post(self.endpoint("token")?)
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::SessionRejected)
            }
            status => Err(AuthError::Provider(format!(
                "token refresh returned {}",
                status
            ))),
        }
    }
}

#[async_trait]
impl AuthProvider for GoTrueProvider {
    async fn current_user(&self, tokens: &SessionTokens) -> Result<AuthOutcome, AuthError> {
        let response = self.fetch_user(&tokens.access_token).await?;

        match response.status() {
            status if status.is_success() => {
                let user: UserBody = response.json().await?;
                Ok(AuthOutcome {
                    user: AuthUser {
                        id: user.id,
                        email: user.email,
                    },
                    refreshed: None,
                })
            }
            // Expired access token: try the refresh token before giving up.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = self.refresh_session(&tokens.refresh_token).await?;
                Ok(AuthOutcome {
                    user: AuthUser {
                        id: body.user.id,
                        email: body.user.email,
                    },
                    refreshed: Some(SessionTokens {
                        access_token: body.access_token,
                        refresh_token: body.refresh_token,
                    }),
                })
            }
            status => Err(AuthError::Provider(format!(
                "user lookup returned {}",
                status
            ))),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, AuthError> {
        let response = self
            .http
            .post(self.endpoint("token")?)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: TokenBody = response.json().await?;
                Ok(SessionTokens {
                    access_token: body.access_token,
                    refresh_token: body.refresh_token,
                })
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(AuthError::InvalidCredentials)
            }
            status => Err(AuthError::Provider(format!("sign-in returned {}", status))),
        }
    }

    async fn sign_out(&self, tokens: &SessionTokens) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.endpoint("logout")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        // An already-dead session is fine; sign-out is idempotent.
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(()),
            status => Err(AuthError::Provider(format!("sign-out returned {}", status))),
        }
    }
}
