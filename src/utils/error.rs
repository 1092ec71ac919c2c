//! Error types for the portal client
//!
//! Domain-specific errors raised by the HTTP and parsing layers. They are
//! folded into [`crate::error::Error`] at module boundaries.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an unexpected status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A session value cannot be sent as an HTTP header
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl FetchError {
    /// Classify a transport error, separating timeouts from other failures
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Errors that can occur while parsing portal responses
#[derive(Error, Debug)]
pub enum ParseError {
    /// Response body was not valid JSON
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON payload did not have the expected shape
    #[error("Unexpected payload: {0}")]
    UnexpectedShape(String),

    /// A date value could not be parsed as `YYYY-MM-DD`
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
