//! Stream event types
//!
//! Contains the StreamEvent enum with every event the mindmap backend emits
//! on its streaming endpoints, plus the frame decoding error.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Typed events from the mindmap streaming API.
///
/// The backend sends one JSON object per `data:` line, discriminated by its
/// `type` field. Types this client does not know are decoded as
/// [`StreamEvent::Unknown`] instead of failing the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Generation has begun
    Start {
        #[serde(default, deserialize_with = "nullable_string")]
        message: String,
    },
    /// Fragment of the model's thinking output
    Reasoning {
        #[serde(default, deserialize_with = "nullable_string")]
        partial: String,
    },
    /// Fragment of the outline document, not necessarily line aligned
    Generating {
        #[serde(default, deserialize_with = "nullable_string")]
        partial: String,
    },
    /// Final document and reasoning; supersedes everything streamed so far
    Complete {
        #[serde(default)]
        data: Option<String>,
        #[serde(default)]
        reasoning: Option<String>,
    },
    /// Backend reported a failure
    Error {
        #[serde(default, deserialize_with = "nullable_string")]
        message: String,
    },
    /// Step or chunk progress reported by the document endpoint
    Progress {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        current: u64,
        #[serde(default)]
        total: u64,
    },
    /// Any other event type
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Returns the event type name as a string for logging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Start { .. } => "start",
            StreamEvent::Reasoning { .. } => "reasoning",
            StreamEvent::Generating { .. } => "generating",
            StreamEvent::Complete { .. } => "complete",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Progress { .. } => "progress",
            StreamEvent::Unknown => "unknown",
        }
    }

    /// Whether this event ends the generation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete { .. } | StreamEvent::Error { .. })
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Errors that can occur while decoding a `data:` frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SseParseError {
    /// The payload after `data: ` is not a JSON event object
    #[error("invalid JSON in data line: {message}")]
    InvalidJson { message: String, payload: String },
}
