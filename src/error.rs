//! Unified error handling for the slotwatch crate
//!
//! Domain errors from the HTTP and parsing layers are folded into a single
//! [`Error`] enum. The watcher only needs to know one thing about an error:
//! whether a full session restart can fix it. [`Error::is_recoverable`] and
//! [`ErrorCategory`] answer that.

use std::io;
use thiserror::Error;

pub use crate::utils::error::{FetchError, ParseError};

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection failures, timeouts and unexpected status codes
    Network,
    /// The portal answered with an explicit error field
    Api,
    /// Malformed JSON or HTML
    Parsing,
    /// Invalid input or configuration
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short label used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Api => "api",
            Self::Parsing => "parsing",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the slotwatch crate
#[derive(Error, Debug)]
pub enum Error {
    /// Transport or status failures on any HTTP call
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Malformed response bodies
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The portal reported an error in its JSON body
    #[error("API error: {message}")]
    Api { message: String },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// The target date given at start-up is missing or malformed
    #[error("Invalid target date: {0:?}")]
    InvalidDate(String),

    /// The optional restart cap was reached
    #[error("Gave up after {attempts} failed attempts")]
    RetriesExhausted { attempts: u32 },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API error from the portal's error message
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Check if a fresh session can recover from this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(_) | Self::Parse(_) | Self::Api { .. } | Self::Io(_) => true,
            Self::Config(_) | Self::InvalidDate(_) | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) => ErrorCategory::Network,
            Self::Api { .. } => ErrorCategory::Api,
            Self::Parse(_) => ErrorCategory::Parsing,
            Self::Config(_) | Self::InvalidDate(_) => ErrorCategory::Config,
            Self::RetriesExhausted { .. } | Self::Io(_) => ErrorCategory::Other,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(FetchError::from_transport(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(ParseError::Json(err))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
