use reqwest::Url;

use crate::api::GatewayError;
use crate::config::Config;

/// End-session URL at the identity provider, redirecting back to the
/// portal's login page once the provider session is gone.
pub fn logout_url(config: &Config) -> Result<String, GatewayError> {
    let idp = &config.identity_provider;
    let endpoint = format!(
        "{}/realms/{}/protocol/openid-connect/logout",
        idp.base_url.trim_end_matches('/'),
        idp.realm
    );
    let redirect = config.url_for(&config.login_path);
    let url = Url::parse_with_params(&endpoint, &[("redirect_uri", redirect.as_str())])
        .map_err(|e| GatewayError::InvalidRequest(format!("bad logout url '{}': {}", endpoint, e)))?;
    Ok(url.to_string())
}
