//! Error types for infogen.

use std::io;
use thiserror::Error;

/// Result type alias for infogen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in infogen operations.
///
/// A generation attempt that fails with any of these leaves history untouched.
/// Malformed individual stream frames are not errors; they are logged and skipped.
#[derive(Debug, Error)]
pub enum Error {
    /// A required credential or setting is missing. Raised before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-success HTTP status or a failure while reading the response.
    #[error("{message}")]
    Transport {
        /// HTTP status code, if the server answered.
        status: Option<u16>,
        /// Server-provided error message, or a generic one.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Config file could not be parsed.
    #[error("Config file error: {0}")]
    Config(String),

    /// Unknown template id.
    #[error("Unknown template: {0}")]
    InvalidTemplate(String),

    /// History record not found.
    #[error("History record not found: {0}")]
    HistoryNotFound(String),

    /// The prompt was empty or whitespace only.
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// The renderer could not produce output.
    #[error("Render error: {0}")]
    Render(String),

    /// The async runtime could not be started.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Output(#[source] io::Error),
}

impl Error {
    /// Build a transport error from a status code and an optional server message.
    #[must_use]
    pub fn from_status(status: u16, server_message: Option<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: server_message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP error! status: {status}")),
        }
    }

    /// HTTP status code carried by a transport error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
