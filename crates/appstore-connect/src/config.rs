//! Client configuration

use std::time::Duration;

use crate::error::{ConnectError, Result};

/// Production App Store Connect API host
pub const API_HOST: &str = "https://api.appstoreconnect.apple.com";

const DEFAULT_USER_AGENT: &str = concat!("appstore-connect/", env!("CARGO_PKG_VERSION"));

/// Connection settings shared by every client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host requests are sent to, without a trailing slash
    pub base_url: String,

    /// User-Agent header value
    pub user_agent: String,

    /// Per-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_HOST.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the host overridable through `APP_STORE_CONNECT_API_URL`
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var("APP_STORE_CONNECT_API_URL") {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url),
            _ => config,
        }
    }

    /// Point the clients at another host, e.g. a mock server in tests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that the base URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ConnectError::Configuration(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConnectError::Configuration(format!(
                "Unsupported URL scheme: {}",
                url.scheme()
            )));
        }

        Ok(())
    }
}
