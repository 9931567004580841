//! Error types for the mindmap client.
//!
//! | Error | Where | Effect |
//! |-------|-------|--------|
//! | [`SseParseError`](crate::sse::SseParseError) | one malformed `data:` line | recorded as a warning, line skipped |
//! | [`GenerationError`] | a generation's terminal failure | transport or application kind |
//! | [`ClientError`] | HTTP calls to the backend | returned to the caller |
//!
//! Every failure is terminal for the generation it belongs to only; each
//! generation owns its own reducer, so nothing carries over to the next one.

mod client;
mod stream;

pub use client::{classify_reqwest_error, ClientError};
pub use stream::{FailureKind, GenerationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
