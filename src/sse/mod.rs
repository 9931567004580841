//! Server-sent event framing for the mindmap streaming API
//!
//! The backend streams a response body made of newline separated lines.
//! Only lines starting with `data: ` matter; each carries one JSON event
//! object tagged by its `type` field. Everything else (comments,
//! keep-alives, blank separators) is skipped.
//!
//! # Module structure
//! - `decoder` - Byte buffer to line splitting (LineDecoder)
//! - `events` - Event type definitions (StreamEvent, SseParseError)
//! - `parser` - `data:` line decoding (parse_data_line)

mod decoder;
mod events;
mod parser;

pub use decoder::LineDecoder;
pub use events::{SseParseError, StreamEvent};
pub use parser::{parse_data_line, DATA_PREFIX};
