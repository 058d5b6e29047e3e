//! Authenticated transport shared by the clients

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::error::{ConnectError, Result};

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_GZIP: &str = "application/a-gzip";

/// Query parameters as `(name, value)` pairs, e.g. `("filter[app]", id)`
pub(crate) type Query<'a> = [(&'a str, String)];

/// HTTP connection to the API plus the credential provider
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            tokens,
        })
    }

    /// Send a JSON request. Non-success statuses are returned, not raised,
    /// so callers can act on 404/409 before turning them into errors.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        self.execute(method, path, query, body, ACCEPT_JSON).await
    }

    /// Download a gzip payload
    pub(crate) async fn download(&self, path: &str, query: &Query<'_>) -> Result<ApiResponse> {
        self.execute(Method::GET, path, query, None, ACCEPT_GZIP)
            .await
    }

    /// GET a JSON document, failing on any non-success status
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
        context: impl FnOnce() -> String,
    ) -> Result<T> {
        self.send(Method::GET, path, query, None)
            .await?
            .error_for_status(context)?
            .json()
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<&Value>,
        accept: &str,
    ) -> Result<ApiResponse> {
        let token = self.tokens.bearer_token()?;
        let url = format!("{}{}", self.base_url, path);

        debug!(%method, %url, "API request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, accept);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!(%method, %url, status = status.as_u16(), "API response");

        Ok(ApiResponse { status, body })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Buffered response: status plus raw body
#[derive(Debug)]
pub(crate) struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

#[derive(Deserialize)]
struct ErrorDocument {
    errors: Vec<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    detail: Option<String>,
    title: Option<String>,
}

impl ApiResponse {
    #[cfg(test)]
    pub(crate) fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: body.into(),
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub(crate) fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// `errors[].detail` from a JSON:API error document, falling back to the
    /// raw body when it is not one
    pub(crate) fn error_details(&self) -> Vec<String> {
        if let Ok(document) = serde_json::from_slice::<ErrorDocument>(&self.body) {
            return document
                .errors
                .into_iter()
                .filter_map(|e| e.detail.or(e.title))
                .collect();
        }

        let text = String::from_utf8_lossy(&self.body).trim().to_string();
        if text.is_empty() {
            Vec::new()
        } else {
            vec![text]
        }
    }

    pub(crate) fn into_error(self, context: impl Into<String>) -> ConnectError {
        ConnectError::Api {
            context: context.into(),
            status: self.status.as_u16(),
            details: self.error_details(),
        }
    }

    pub(crate) fn error_for_status(self, context: impl FnOnce() -> String) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error(context()))
        }
    }
}
