//! Client error types.

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status} ({kind}): {message}")]
    ServerError {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error body returned by the server: `{ "error": kind, "message": text }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl ClientError {
    /// Builds the error for a non-success response from its status and body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (kind, message) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => (parsed.error, parsed.message),
            Err(_) => ("unknown".to_string(), body.trim().to_string()),
        };

        if status == 404 {
            ClientError::NotFound { message }
        } else {
            ClientError::ServerError {
                status,
                kind,
                message,
            }
        }
    }
}
