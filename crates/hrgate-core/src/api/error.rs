use reqwest::StatusCode;
use thiserror::Error;

/// Outcome category of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    Unauthenticated,
    Forbidden,
    OtherError,
    /// No response was received at all
    TransportFailure,
}

impl Classification {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            200..=299 => Classification::Success,
            401 => Classification::Unauthenticated,
            403 => Classification::Forbidden,
            _ => Classification::OtherError,
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No access token available - login required")]
    NoTokenAvailable,

    #[error("Unauthorized - session may be expired")]
    Unauthenticated,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl GatewayError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build the error for a non-success status. Callers only pass non-2xx.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match Classification::from_status(status) {
            Classification::Unauthenticated => GatewayError::Unauthenticated,
            Classification::Forbidden => GatewayError::Forbidden(truncated),
            _ => GatewayError::Http {
                status: status.as_u16(),
                body: truncated,
            },
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            GatewayError::NoTokenAvailable | GatewayError::Unauthenticated => {
                Classification::Unauthenticated
            }
            GatewayError::Forbidden(_) => Classification::Forbidden,
            GatewayError::Transport(_) => Classification::TransportFailure,
            GatewayError::Http { .. }
            | GatewayError::InvalidResponse(_)
            | GatewayError::InvalidRequest(_) => Classification::OtherError,
        }
    }

    /// Not recoverable client-side: the user has to log in again.
    pub fn requires_login(&self) -> bool {
        self.classification() == Classification::Unauthenticated
    }
}
