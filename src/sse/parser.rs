//! Frame decoding for `data: <json>` lines.

use crate::sse::events::{SseParseError, StreamEvent};

/// Literal prefix of every line that carries an event.
pub const DATA_PREFIX: &str = "data: ";

/// Decode one line of a streamed body.
///
/// Returns:
/// - `None` - the line is not a `data: ` line (comments, keep-alives,
///   blank separators, `event:` lines) and should be ignored
/// - `Some(Ok(event))` - a decoded event
/// - `Some(Err(error))` - a data line whose payload is not a valid event
pub fn parse_data_line(line: &str) -> Option<Result<StreamEvent, SseParseError>> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    Some(
        serde_json::from_str(payload).map_err(|e| SseParseError::InvalidJson {
            message: e.to_string(),
            payload: payload.to_string(),
        }),
    )
}
