use reqwest::Method;
use serde::Serialize;

use super::GatewayError;

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    /// Urlencoded form fields, in document order
    Form(Vec<(String, String)>),
}

/// One outgoing call, consumed by [`Gateway::send`](super::Gateway::send).
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Portal path (`/api/employees/42`) or absolute URL
    pub url: String,
    pub method: Method,
    pub body: Option<Body>,
    /// Query string pairs appended to the URL
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Parse an HTML-style method name ("post", "DELETE"). Empty means POST,
    /// which is what a form without an explicit method submits with here.
    pub fn parse_method(name: &str) -> Result<Method, GatewayError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(Method::POST);
        }
        Method::from_bytes(trimmed.to_uppercase().as_bytes())
            .map_err(|_| GatewayError::InvalidRequest(format!("unknown method '{}'", name)))
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, GatewayError> {
        let value = serde_json::to_value(body)
            .map_err(|e| GatewayError::InvalidRequest(format!("unserializable body: {}", e)))?;
        self.body = Some(Body::Json(value));
        Ok(self)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(Body::Form(fields));
        self
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
