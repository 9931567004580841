//! Common test utilities for integration tests.
//!
//! Builders for server-sent event bodies and a helper that mounts a
//! streaming endpoint on a wiremock server.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//! use common::{sse_body, generating, complete};
//!
//! let body = sse_body(&[generating("# Topic\n"), complete("# Topic\n")]);
//! ```
#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEXT_STREAM_ROUTE: &str = "/api/v1/mindmap/from-text/stream";
pub const DOCUMENT_STREAM_ROUTE: &str = "/api/v1/mindmap/from-document/stream";
pub const HEALTH_ROUTE: &str = "/api/v1/mindmap/health";

/// Outline used across tests: one topic with two branches.
pub const SAMPLE_OUTLINE: &str = "# Topic\n## A\n- a1\n## B\n";

/// One `data:` frame, terminated by a blank line.
pub fn sse_frame(event: &Value) -> String {
    format!("data: {}\n\n", event)
}

/// Concatenate frames into a full response body.
pub fn sse_body(events: &[Value]) -> String {
    events.iter().map(sse_frame).collect()
}

pub fn start(message: &str) -> Value {
    json!({ "type": "start", "message": message })
}

pub fn reasoning(partial: &str) -> Value {
    json!({ "type": "reasoning", "partial": partial })
}

pub fn generating(partial: &str) -> Value {
    json!({ "type": "generating", "partial": partial })
}

pub fn complete(data: &str) -> Value {
    json!({ "type": "complete", "data": data, "reasoning": "" })
}

pub fn error(message: &str) -> Value {
    json!({ "type": "error", "message": message })
}

/// The sample outline streamed a few characters at a time, then completed.
pub fn sample_events() -> Vec<Value> {
    let mut events = vec![start("Generating mindmap")];
    let chars: Vec<char> = SAMPLE_OUTLINE.chars().collect();
    for piece in chars.chunks(3) {
        events.push(generating(&piece.iter().collect::<String>()));
    }
    events.push(complete(SAMPLE_OUTLINE));
    events
}

/// Serve `body` as an event stream on POST `route`.
pub async fn mount_stream(server: &MockServer, route: &str, body: String) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}
