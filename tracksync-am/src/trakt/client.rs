//! Trakt API client

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use super::models::{TokenGrant, UserSettings};
use crate::authorizer::{IdentityApi, TokenExchange};

const TRAKT_BASE_URL: &str = "https://api.trakt.tv";
const TRAKT_API_VERSION: &str = "2";
/// Out-of-band redirect used for PIN-based authorization
const PIN_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
const USER_AGENT: &str = "TrackSync/0.1.0 (https://github.com/tracksync/tracksync)";

/// Trakt client errors
#[derive(Debug, Error)]
pub enum TraktError {
    #[error("Network error: {0}")]
    Network(String),

    /// The token endpoint rejected the PIN (invalid or expired)
    #[error("Token exchange rejected (HTTP {0})")]
    ExchangeRejected(u16),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Application credentials identifying this installation to Trakt
///
/// Distinct from the per-account OAuth credentials stored in the database.
#[derive(Debug, Clone)]
pub struct TraktAppCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
}

/// Trakt API client
#[derive(Clone)]
pub struct TraktClient {
    http_client: reqwest::Client,
    app: TraktAppCredentials,
    base_url: String,
}

impl TraktClient {
    pub fn new(app: TraktAppCredentials) -> Result<Self, TraktError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TraktError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            app,
            base_url: TRAKT_BASE_URL.to_string(),
        })
    }

    /// Exchange an authorization PIN for access/refresh tokens
    pub async fn exchange_pin(&self, pin: &str) -> Result<TokenGrant, TraktError> {
        let url = format!("{}/oauth/token", self.base_url);

        let body = TokenRequest {
            code: pin,
            client_id: &self.app.client_id,
            client_secret: &self.app.client_secret,
            redirect_uri: PIN_REDIRECT_URI,
            grant_type: "authorization_code",
        };

        tracing::debug!(url = %url, "Exchanging authorization PIN for tokens");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TraktError::Network(e.to_string()))?;

        let status = response.status();

        // 400/401 means the PIN itself was not accepted
        if status == 400 || status == 401 {
            return Err(TraktError::ExchangeRejected(status.as_u16()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TraktError::Api(status.as_u16(), error_text));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| TraktError::Parse(e.to_string()))
    }

    /// Fetch the remote user's settings using an explicit access token
    ///
    /// The token is passed per call; the client holds no ambient
    /// authorization state. Returns `Ok(None)` when the endpoint responds
    /// without a usable body.
    pub async fn user_settings(
        &self,
        access_token: &str,
    ) -> Result<Option<UserSettings>, TraktError> {
        let url = format!("{}/users/settings", self.base_url);

        tracing::debug!(url = %url, "Fetching user settings for authorization check");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .header("trakt-api-version", TRAKT_API_VERSION)
            .header("trakt-api-key", &self.app.client_id)
            .send()
            .await
            .map_err(|e| TraktError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TraktError::Api(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TraktError::Network(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| TraktError::Parse(e.to_string()))
    }
}

impl TokenExchange for TraktClient {
    async fn exchange_pin(&self, pin: &str) -> Result<TokenGrant, TraktError> {
        TraktClient::exchange_pin(self, pin).await
    }
}

impl IdentityApi for TraktClient {
    async fn user_settings(&self, access_token: &str) -> Result<Option<UserSettings>, TraktError> {
        TraktClient::user_settings(self, access_token).await
    }
}
