//! Generation failure types.
//!
//! A generation ends in failure for one of two reasons: the transport broke
//! (connection refused, non-success status, body interrupted before a
//! terminal event) or the backend sent an `error` event. The two kinds are
//! surfaced differently to the user.

use serde::Serialize;
use thiserror::Error;

/// Which side of the wire a generation failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The stream could not be opened or was interrupted.
    Transport,
    /// The backend reported the failure through an `error` event.
    Application,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Application => "application",
        }
    }
}

/// Terminal failure of one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Stream could not be opened or ended before a terminal event.
    #[error("stream transport failed: {message}")]
    Transport { message: String },

    /// Backend sent an `error` event.
    #[error("backend reported an error: {message}")]
    Application { message: String },

    /// A newer generation replaced this one before it finished.
    #[error("generation was cancelled")]
    Cancelled,
}

impl GenerationError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            FailureKind::Transport => GenerationError::Transport { message },
            FailureKind::Application => GenerationError::Application { message },
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Transport { .. })
    }

    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            GenerationError::Transport { .. } => Some(FailureKind::Transport),
            GenerationError::Application { .. } => Some(FailureKind::Application),
            GenerationError::Cancelled => None,
        }
    }

    /// Get a user-friendly error message.
    ///
    /// Transport failures get a generic retry notice; backend messages are
    /// shown verbatim.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::Transport { .. } => "Processing failed, please try again.".to_string(),
            GenerationError::Application { message } => message.clone(),
            GenerationError::Cancelled => "Generation was cancelled.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            GenerationError::Transport { .. } => "E_GEN_TRANSPORT",
            GenerationError::Application { .. } => "E_GEN_BACKEND",
            GenerationError::Cancelled => "E_GEN_CANCELLED",
        }
    }
}
