//! Error types for App Store Connect operations

use thiserror::Error;

use crate::types::BuildProcessingState;

/// Errors returned by the App Store Connect clients
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The API answered with a non-success status
    #[error("{context}. Status code: {status}. Errors: {}", details.join(", "))]
    Api {
        /// What was being attempted, including the identifying keys
        context: String,
        /// HTTP status code
        status: u16,
        /// `errors[].detail` entries from the response body
        details: Vec<String>,
    },

    /// A record looked up by its natural key does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A lookup that must resolve to exactly one record did not
    #[error("Expected exactly one {what}, found {found}")]
    Cardinality { what: String, found: usize },

    /// Build processing finished in a failure state
    #[error("Build processing failed with state {state}")]
    ProcessingFailed { state: BuildProcessingState },

    /// Polling gave up before the build reached a terminal state
    #[error("Timed out waiting for processing to complete (state: {last_state})")]
    Timeout { last_state: BuildProcessingState },

    /// The credential provider could not produce a token
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ConnectError {
    /// HTTP status associated with the error, if any.
    ///
    /// `NotFound` reports 404 even though it may originate from an empty
    /// result set rather than an HTTP 404.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectError::Api { status, .. } => Some(*status),
            ConnectError::NotFound(_) => Some(404),
            ConnectError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error means "no such record"
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the API rejected the request with 409 Conflict
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    pub(crate) fn cardinality(what: impl Into<String>, found: usize) -> Self {
        ConnectError::Cardinality {
            what: what.into(),
            found,
        }
    }
}

/// Result type for App Store Connect operations
pub type Result<T> = std::result::Result<T, ConnectError>;
