//! Bearer credentials for API requests
//!
//! Signing and refreshing tokens is the provider's business. The clients only
//! ask for the current token before each request.

use crate::error::{ConnectError, Result};

/// Source of the bearer token sent with every request
pub trait TokenProvider: Send + Sync {
    /// Get the current bearer token
    fn bearer_token(&self) -> Result<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn bearer_token(&self) -> Result<String> {
        self()
    }
}

/// A provider that always hands out the same token
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Create from the `APP_STORE_CONNECT_TOKEN` environment variable
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("APP_STORE_CONNECT_TOKEN").map_err(|_| {
            ConnectError::Configuration("APP_STORE_CONNECT_TOKEN not set".to_string())
        })?;
        Ok(Self::new(token))
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(ConnectError::InvalidCredentials(
                "Bearer token is empty".to_string(),
            ));
        }
        Ok(self.token.clone())
    }
}
