//! HTTP client error types.

use thiserror::Error;

use super::stream::{FailureKind, GenerationError};

/// Errors returned by [`crate::client::MindmapClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not connect to the backend.
    #[error("failed to connect to {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Any other reqwest failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered `success: false` on a non-streaming endpoint.
    #[error("backend error: {0}")]
    Backend(String),

    /// The generation ended without a document.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ClientError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::ConnectionFailed { .. } | ClientError::Timeout { .. } => true,
            ClientError::Http(_) => true,
            ClientError::Status { status, .. } => *status == 429 || *status >= 500,
            ClientError::Generation(err) => err.is_retryable(),
            ClientError::Json(_) | ClientError::Backend(_) => false,
        }
    }

    /// How a generation driven by this error should be recorded.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ClientError::Backend(_) => FailureKind::Application,
            ClientError::Generation(GenerationError::Application { .. }) => {
                FailureKind::Application
            }
            _ => FailureKind::Transport,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Backend(message) => message.clone(),
            ClientError::Generation(err) => err.user_message(),
            _ => "Processing failed, please try again.".to_string(),
        }
    }
}

/// Classify a reqwest error into a ClientError with the request URL attached.
pub fn classify_reqwest_error(err: reqwest::Error, url: &str) -> ClientError {
    if err.is_connect() {
        ClientError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        ClientError::Timeout {
            url: url.to_string(),
        }
    } else if let Some(status) = err.status() {
        ClientError::Status {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else {
        ClientError::Http(err)
    }
}
