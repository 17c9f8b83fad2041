use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body returned by delete/submit/attendance endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResult {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ActionResult {
    /// Parse a form or attendance reply body. Empty or non-JSON bodies count
    /// as a bare success, since the status code already said 2xx.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(body).unwrap_or_else(|e| {
            debug!(error = %e, "Reply body is not an action result, treating as bare success");
            Self::default()
        })
    }

    /// Only an explicit `"success": false` is a failure.
    pub fn is_success(&self) -> bool {
        self.success != Some(false)
    }

    /// Strict form used for deletes: the server must say `"success": true`.
    pub fn is_confirmed(&self) -> bool {
        self.success == Some(true)
    }

    /// Server-provided text, preferring `message` over `error`
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}
