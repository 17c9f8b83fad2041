//! Per-page session context.
//!
//! The host creates one `SessionContext` and hands it to every binding. It
//! owns the configuration, the token store and the gateway, so no binding
//! reaches for global state.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::api::{Gateway, GatewayError};
use crate::auth::{logout_url, SessionToken, TokenStore};
use crate::config::Config;

fn http_client(config: &Config) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| GatewayError::InvalidRequest(format!("failed to build HTTP client: {}", e)))
}

pub struct SessionContext {
    config: Config,
    tokens: Arc<TokenStore>,
    gateway: Gateway,
}

impl SessionContext {
    pub fn new(config: Config) -> Result<Self, GatewayError> {
        let client = http_client(&config)?;
        let tokens = Arc::new(TokenStore::new(client.clone(), config.token_url()));
        Ok(Self::with_tokens(config, client, tokens))
    }

    /// Context whose cache starts out holding `token`, e.g. one handed over
    /// by the host instead of fetched from the portal.
    pub async fn with_seeded_token(config: Config, token: SessionToken) -> Result<Self, GatewayError> {
        let client = http_client(&config)?;
        let tokens = TokenStore::new(client.clone(), config.token_url())
            .with_token(token)
            .await;
        Ok(Self::with_tokens(config, client, Arc::new(tokens)))
    }

    /// Build around an existing token store, e.g. one seeded with a token.
    pub fn with_tokens(config: Config, client: Client, tokens: Arc<TokenStore>) -> Self {
        let gateway = Gateway::new(client, config.origin(), Arc::clone(&tokens));
        Self {
            config,
            tokens,
            gateway,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Login entry point the bindings redirect to
    pub fn login_path(&self) -> &str {
        &self.config.login_path
    }

    /// Drop the cached token and return the identity provider logout URL.
    pub async fn logout(&self) -> Result<String, GatewayError> {
        self.tokens.clear().await;
        info!("Logged out, token cache cleared");
        logout_url(&self.config)
    }
}
