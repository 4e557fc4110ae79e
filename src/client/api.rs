//! HTTP access to the SkillSwap auth endpoints.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::json;
use tracing::debug;

use super::{ApiError, ClientConfig};
use crate::auth::dto::{ErrorBody, LoginResponse, MeResponse, PublicUser};
use crate::auth::extractors::TOKEN_HEADER;

/// The auth service as seen from the client.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, ApiError>;
    async fn me(&self, token: &str) -> Result<PublicUser, ApiError>;
}

/// Clone is cheap; reqwest::Client shares its connection pool.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Turns a non-success response into `ApiError::Status`, keeping the
    /// server's message when the body has one.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_else(|_| status.to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/api/auth/login", self.base_url);
        debug!(%url, "submitting login");
        let response = self
            .client
            .post(&url)
            .json(&json!({ "username": identifier, "password": password }))
            .send()
            .await?;
        let body: LoginResponse = Self::check_response(response).await?.json().await?;
        if body.token.is_empty() {
            return Err(ApiError::InvalidResponse("login response without token".into()));
        }
        Ok(body)
    }

    async fn me(&self, token: &str) -> Result<PublicUser, ApiError> {
        let url = format!("{}/api/auth/me", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, token)
            .send()
            .await?;
        let body: MeResponse = Self::check_response(response).await?.json().await?;
        Ok(body.user)
    }
}
