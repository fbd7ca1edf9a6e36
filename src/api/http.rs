//! reqwest-backed implementation of [`AuthApi`].

use serde::Serialize;
use serde::de::IgnoredAny;

use super::AuthApi;
use super::types::{ApiError, Credentials, Registration, TokenBody, TokenGrant, UserProfile, Verdict, parse_envelope};
use crate::config::{ClientConfig, Timeouts};

pub const AUTHENTICATE_PATH: &str = "/users/authenticate";
pub const VALIDATE_PATH: &str = "/users";
pub const EXPIRE_PATH: &str = "/users/expire";
pub const REGISTER_PATH: &str = "/users/register";

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Build a client for `base_url` (already normalized, no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error if the reqwest client fails to build.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_owned() })
    }

    /// # Errors
    ///
    /// Returns an error if the reqwest client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json(&self, path: &str, body: &impl Serialize) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "posting");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Verdict<TokenGrant>, ApiError> {
        let text = self.post_json(AUTHENTICATE_PATH, credentials).await?;
        parse_envelope::<TokenGrant>(&text)?.into_verdict("authenticate")
    }

    async fn validate(&self, token: &str) -> Result<Verdict<UserProfile>, ApiError> {
        let text = self.post_json(VALIDATE_PATH, &TokenBody { token }).await?;
        parse_envelope::<UserProfile>(&text)?.into_verdict("validate")
    }

    async fn expire(&self, token: &str) -> Result<Verdict<()>, ApiError> {
        let text = self.post_json(EXPIRE_PATH, &TokenBody { token }).await?;
        Ok(parse_envelope::<IgnoredAny>(&text)?.into_status())
    }

    async fn register(&self, registration: &Registration) -> Result<Verdict<()>, ApiError> {
        let text = self.post_json(REGISTER_PATH, registration).await?;
        Ok(parse_envelope::<IgnoredAny>(&text)?.into_status())
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
