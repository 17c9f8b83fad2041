//! The authenticated request gateway.
//!
//! `Gateway::send` is the one path every authenticated call takes: acquire a
//! token, attach it as a bearer header on top of the caller's headers, issue
//! the request, and classify what came back. It never retries, never
//! refreshes tokens, and leaves the token cache alone on failure.

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{SessionToken, TokenStore};
use crate::config::join_url;

use super::{Body, GatewayError, RequestDescriptor};

/// A received 2xx response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        serde_json::from_str(&self.body)
            .map_err(|e| GatewayError::InvalidResponse(format!("{} (status {})", e, self.status)))
    }
}

/// Attaches bearer tokens to portal requests and classifies responses.
/// Clone is cheap - the client and token store are shared.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    origin: String,
    tokens: Arc<TokenStore>,
}

impl Gateway {
    pub fn new(client: Client, origin: impl Into<String>, tokens: Arc<TokenStore>) -> Self {
        Self {
            client,
            origin: origin.into(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.origin, path)
    }

    /// Send an authenticated request.
    ///
    /// Without a token nothing is sent and `NoTokenAvailable` is returned;
    /// the caller redirects to login. Non-2xx statuses come back as errors
    /// classified per [`Classification::from_status`](super::Classification::from_status).
    pub async fn send(&self, request: &RequestDescriptor) -> Result<Reply, GatewayError> {
        let token = match self.tokens.acquire_token().await? {
            Some(token) => token,
            None => {
                warn!(url = %request.url, "No access token, request not sent");
                return Err(GatewayError::NoTokenAvailable);
            }
        };
        self.dispatch(request, &token).await
    }

    fn build_headers(
        request: &RequestDescriptor,
        token: &SessionToken,
    ) -> Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| GatewayError::InvalidRequest(format!("bad header name '{}'", name)))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                GatewayError::InvalidRequest(format!("bad value for header '{}'", name))
            })?;
            headers.append(name, value);
        }
        let mut value = HeaderValue::from_str(&token.bearer())
            .map_err(|_| GatewayError::InvalidRequest("token is not a valid header value".into()))?;
        value.set_sensitive(true);
        // insert() replaces any caller-supplied Authorization
        headers.insert(header::AUTHORIZATION, value);
        Ok(headers)
    }

    async fn dispatch(
        &self,
        request: &RequestDescriptor,
        token: &SessionToken,
    ) -> Result<Reply, GatewayError> {
        let url = self.url_for(&request.url);
        let headers = Self::build_headers(request, token)?;

        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            Some(Body::Json(value)) => builder.json(value),
            Some(Body::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            warn!(method = %request.method, url = %url, error = %e, "Request failed to reach server");
            GatewayError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            debug!(status = %status, url = %url, "Request succeeded");
            Ok(Reply { status, body })
        } else {
            warn!(status = %status, url = %url, "Request refused");
            Err(GatewayError::from_status(status, &body))
        }
    }
}
