//! Reducer state types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{FailureKind, GenerationError};

/// Lifecycle of one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Nothing received yet
    #[default]
    Idle,
    /// At least one chunk or event received, no terminal event yet
    Streaming,
    /// `complete` received; the document is the backend's final answer
    Complete,
    /// Transport broke or the backend sent `error`
    Failed { kind: FailureKind, message: String },
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::Failed { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Streaming => "streaming",
            Phase::Complete => "complete",
            Phase::Failed { .. } => "failed",
        }
    }
}

/// A human-readable progress note (`start` messages, chunk progress).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl Note {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            message: message.into(),
        }
    }
}

/// Everything a display needs to show a generation in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReducerState {
    /// Completed lines of the outline, ready for the outline parser
    pub document: String,
    /// Text received since the last flush, not yet newline terminated
    pub pending_line: String,
    /// Thinking text, kept apart from the document
    pub reasoning: String,
    pub phase: Phase,
    pub notes: Vec<Note>,
    /// Frames that could not be decoded and were skipped
    pub warnings: Vec<String>,
}

impl ReducerState {
    /// Final outcome, once the phase is terminal.
    ///
    /// A generation that is still idle or streaming has no outcome yet and
    /// is reported as an interrupted transport.
    pub fn result(&self) -> Result<&str, GenerationError> {
        match &self.phase {
            Phase::Complete => Ok(&self.document),
            Phase::Failed { kind, message } => Err(GenerationError::new(*kind, message.clone())),
            Phase::Idle | Phase::Streaming => Err(GenerationError::new(
                FailureKind::Transport,
                "stream ended before completion",
            )),
        }
    }
}
