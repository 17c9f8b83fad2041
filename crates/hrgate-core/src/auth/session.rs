use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::GatewayError;

/// Bearer credential issued by the backend session. Never parsed client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl SessionToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Shape of the `/api/get-token` payload
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Option<SessionToken> {
        let access_token = self.access_token.filter(|t| !t.is_empty())?;
        Some(SessionToken {
            access_token,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
        })
    }
}

/// Holds the current bearer token, fetched from the backend on demand.
///
/// The lock is never held across the network call, so two callers that both
/// miss the cache may both fetch. The result is the same token, last write
/// wins.
pub struct TokenStore {
    client: Client,
    token_url: String,
    cached: RwLock<Option<SessionToken>>,
}

impl TokenStore {
    pub fn new(client: Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            cached: RwLock::new(None),
        }
    }

    /// Pre-seed the cache, e.g. with a token handed over by the host page.
    pub async fn with_token(self, token: SessionToken) -> Self {
        *self.cached.write().await = Some(token);
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Cached token, no network I/O
    pub async fn cached(&self) -> Option<SessionToken> {
        self.cached.read().await.clone()
    }

    /// Return the cached token, or fetch one from the backend.
    ///
    /// A refusal from the token endpoint (any non-2xx, or a body without an
    /// access token) yields `Ok(None)`. Only a failure to reach the endpoint
    /// at all is an error, so callers can tell "not logged in" from "server
    /// unreachable".
    pub async fn acquire_token(&self) -> Result<Option<SessionToken>, GatewayError> {
        if let Some(token) = self.cached().await {
            return Ok(Some(token));
        }
        self.fetch().await
    }

    /// Drop the cache and fetch a fresh token.
    pub async fn refresh(&self) -> Result<Option<SessionToken>, GatewayError> {
        self.clear().await;
        self.fetch().await
    }

    /// Discard the cached token (logout).
    pub async fn clear(&self) {
        if self.cached.write().await.take().is_some() {
            debug!("Cleared cached access token");
        }
    }

    async fn fetch(&self) -> Result<Option<SessionToken>, GatewayError> {
        debug!(url = %self.token_url, "Fetching access token");

        let response = self.client.get(&self.token_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "No token yet - user probably not logged in");
            return Ok(None);
        }

        let body = response.text().await?;
        let token = match serde_json::from_str::<TokenResponse>(&body) {
            Ok(parsed) => parsed.into_token(),
            Err(e) => {
                warn!(error = %e, "Failed to parse token response");
                None
            }
        };

        match token {
            Some(token) => {
                info!("Access token loaded from backend");
                *self.cached.write().await = Some(token.clone());
                Ok(Some(token))
            }
            None => {
                warn!("Token response did not contain an access token");
                Ok(None)
            }
        }
    }
}
