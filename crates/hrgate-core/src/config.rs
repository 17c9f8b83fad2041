//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: where
//! the portal lives, which backend paths the bindings talk to, and where the
//! identity provider's logout endpoint is.
//!
//! Configuration is stored at `~/.config/hrgate/config.json`. Environment
//! variables `HRGATE_BASE_URL` and `HRGATE_IDP_URL` override the file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application name used for config directory paths
const APP_NAME: &str = "hrgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment override for the portal origin
pub const ENV_BASE_URL: &str = "HRGATE_BASE_URL";

/// Environment override for the identity provider origin
pub const ENV_IDP_URL: &str = "HRGATE_IDP_URL";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentityProviderConfig {
    pub base_url: String,
    pub realm: String,
}

impl Default for IdentityProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            realm: "HR-System".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Origin of the portal, e.g. `http://localhost:5000`
    pub base_url: String,
    pub token_path: String,
    pub login_path: String,
    pub attendance_path: String,
    pub edit_path_prefix: String,
    pub request_timeout_secs: u64,
    pub identity_provider: IdentityProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            token_path: "/api/get-token".to_string(),
            login_path: "/login".to_string(),
            attendance_path: "/api/attendance".to_string(),
            edit_path_prefix: "/admin/employees/edit".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            identity_provider: IdentityProviderConfig::default(),
        }
    }
}

impl Config {
    /// Load the config file (defaults when missing) and apply env overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override origins from the environment when set and non-empty.
    pub fn apply_env(&mut self) {
        if let Some(url) = non_empty_env(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = non_empty_env(ENV_IDP_URL) {
            self.identity_provider.base_url = url;
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Portal origin without a trailing slash
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Absolute URL for a portal path; absolute URLs pass through unchanged.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub fn token_url(&self) -> String {
        self.url_for(&self.token_path)
    }

    pub fn edit_path(&self, employee_id: &str) -> String {
        format!("{}/{}", self.edit_path_prefix.trim_end_matches('/'), employee_id)
    }
}

/// Resolve a portal path against an origin; absolute URLs pass through.
pub fn join_url(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", origin, path)
    } else {
        format!("{}/{}", origin, path)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
