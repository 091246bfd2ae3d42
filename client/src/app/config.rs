//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::http::DEFAULT_USER_AGENT;

/// Authority used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://back-end-443z.onrender.com";

/// Settings controlling how the client reaches the authority.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRATION")]
pub struct ClientSettings {
    /// Base URL of the authority API.
    pub base_url: Option<String>,
    /// Quiet period before a login edit is checked, in milliseconds.
    #[ortho_config(default = 400)]
    pub debounce_ms: u64,
    /// Per-request timeout, in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// HTTP user-agent override.
    pub user_agent: Option<String>,
    /// Pre-issued bearer token attached to every request.
    pub token: Option<String>,
}

impl ClientSettings {
    /// Return the configured base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not an absolute URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// Return the debounce delay.
    pub const fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Return the request timeout.
    ///
    /// Zero is raised to one second so requests cannot fail instantly.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Return the user-agent, falling back to the crate name and version.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Return the configured token, if non-blank.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
