//! Stream reducer: folds streamed events into a live document.
//!
//! A [`StreamReducer`] is created per generation request. Raw response
//! chunks go in through [`StreamReducer::feed_bytes`]; the reducer splits
//! them into lines, decodes `data:` frames and applies each event to its
//! [`ReducerState`]:
//!
//! | event | effect |
//! |-------|--------|
//! | `start` | progress note |
//! | `reasoning` | appended to the reasoning text |
//! | `generating` | buffered into the pending line, flushed to the document once it holds a newline; fragments carrying `<think>` go to the reasoning text instead |
//! | `complete` | pending line flushed, then document and reasoning replaced by the backend's final values |
//! | `error` | phase becomes failed |
//!
//! After every mutation the current state is published to subscribers, so
//! a display can re-render the partial outline as lines arrive.

mod state;

pub use state::{Note, Phase, ReducerState};

use tokio::sync::watch;
use uuid::Uuid;

use crate::error::FailureKind;
use crate::models::OutlineNode;
use crate::outline::parse_outline;
use crate::sse::{parse_data_line, LineDecoder, StreamEvent};

/// Marker some backends inline into the generation channel to open a
/// reasoning block. Only the opening tag is recognised.
pub const THINK_MARKER: &str = "<think>";

/// What a single event did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A progress note was recorded
    Noted,
    /// Reasoning text grew
    ReasoningAppended,
    /// Text was held in the pending line
    LineBuffered,
    /// The pending line was moved into the document
    DocumentFlushed,
    /// Generation completed
    Completed,
    /// Generation failed
    Failed,
    /// Nothing changed
    Ignored,
}

impl Transition {
    /// Whether the document text changed, i.e. the outline should be
    /// re-rendered.
    pub fn changes_document(&self) -> bool {
        matches!(self, Transition::DocumentFlushed | Transition::Completed)
    }
}

/// Incremental reducer over one generation's event stream.
pub struct StreamReducer {
    id: Uuid,
    decoder: LineDecoder,
    state: ReducerState,
    updates: watch::Sender<ReducerState>,
}

impl StreamReducer {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(ReducerState::default());
        Self {
            id: Uuid::new_v4(),
            decoder: LineDecoder::new(),
            state: ReducerState::default(),
            updates,
        }
    }

    /// Identifier used to correlate log lines of one generation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current state (polling interface).
    pub fn state(&self) -> &ReducerState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> ReducerState {
        self.state.clone()
    }

    pub fn document(&self) -> &str {
        &self.state.document
    }

    pub fn reasoning(&self) -> &str {
        &self.state.reasoning
    }

    pub fn phase(&self) -> &Phase {
        &self.state.phase
    }

    /// Parse the document received so far.
    pub fn outline(&self) -> OutlineNode {
        parse_outline(&self.state.document)
    }

    /// Receive a fresh state after every mutation (subscription interface).
    pub fn subscribe(&self) -> watch::Receiver<ReducerState> {
        self.updates.send_replace(self.state.clone());
        self.updates.subscribe()
    }

    /// Feed one raw chunk from the transport.
    ///
    /// Returns the transitions caused by the events the chunk completed, in
    /// order. Lines that are not `data:` frames are skipped, and frames with
    /// invalid JSON are recorded in `warnings` and skipped.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Vec<Transition> {
        if self.state.phase == Phase::Idle {
            self.state.phase = Phase::Streaming;
            self.publish();
        }

        self.decoder
            .push(chunk)
            .into_iter()
            .filter_map(|line| self.process_line(&line))
            .collect()
    }

    fn process_line(&mut self, line: &str) -> Option<Transition> {
        match parse_data_line(line)? {
            Ok(event) => Some(self.apply(event)),
            Err(err) => {
                tracing::warn!(generation = %self.id, "Skipping malformed frame: {}", err);
                self.state.warnings.push(err.to_string());
                self.publish();
                None
            }
        }
    }

    /// Apply a decoded event.
    ///
    /// Events after a terminal phase are ignored.
    pub fn apply(&mut self, event: StreamEvent) -> Transition {
        if self.state.phase.is_terminal() {
            tracing::debug!(
                generation = %self.id,
                event = event.event_type_name(),
                "Ignoring event after terminal phase"
            );
            return Transition::Ignored;
        }
        tracing::trace!(generation = %self.id, event = event.event_type_name(), "Applying event");

        let was_idle = self.state.phase == Phase::Idle;
        if was_idle {
            self.state.phase = Phase::Streaming;
        }

        let transition = match event {
            StreamEvent::Start { message } => {
                tracing::info!(generation = %self.id, "Generation started: {}", message);
                self.state.notes.push(Note::now(message));
                Transition::Noted
            }
            StreamEvent::Reasoning { partial } => {
                self.state.reasoning.push_str(&partial);
                Transition::ReasoningAppended
            }
            StreamEvent::Generating { partial } => self.apply_generating(&partial),
            StreamEvent::Complete { data, reasoning } => {
                self.flush_pending();
                if let Some(data) = data {
                    self.state.document = data;
                }
                if let Some(reasoning) = reasoning {
                    self.state.reasoning = reasoning;
                }
                self.state.phase = Phase::Complete;
                tracing::info!(
                    generation = %self.id,
                    bytes = self.state.document.len(),
                    "Generation complete"
                );
                Transition::Completed
            }
            StreamEvent::Error { message } => {
                tracing::info!(generation = %self.id, "Backend reported error: {}", message);
                self.state.phase = Phase::Failed {
                    kind: FailureKind::Application,
                    message,
                };
                Transition::Failed
            }
            StreamEvent::Progress {
                message,
                current,
                total,
            } => {
                self.state
                    .notes
                    .push(Note::now(progress_note(message, current, total)));
                Transition::Noted
            }
            StreamEvent::Unknown => Transition::Ignored,
        };

        if was_idle || transition != Transition::Ignored {
            self.publish();
        }
        transition
    }

    fn apply_generating(&mut self, partial: &str) -> Transition {
        if partial.is_empty() {
            return Transition::Ignored;
        }

        if partial.contains(THINK_MARKER) {
            self.state
                .reasoning
                .push_str(&partial.replacen(THINK_MARKER, "", 1));
            return Transition::ReasoningAppended;
        }

        self.state.pending_line.push_str(partial);
        if self.state.pending_line.contains('\n') {
            self.flush_pending();
            Transition::DocumentFlushed
        } else {
            Transition::LineBuffered
        }
    }

    fn flush_pending(&mut self) {
        if !self.state.pending_line.is_empty() {
            let pending = std::mem::take(&mut self.state.pending_line);
            self.state.document.push_str(&pending);
        }
    }

    /// The transport ended.
    ///
    /// Any unterminated last line is processed. If no terminal event has
    /// arrived by then, the pending line is kept in the document and the
    /// generation fails as an interrupted transport.
    pub fn finish(&mut self) -> Transition {
        if let Some(line) = self.decoder.finish() {
            self.process_line(&line);
        }
        if self.state.phase.is_terminal() {
            return Transition::Ignored;
        }
        self.fail(FailureKind::Transport, "stream ended before completion")
    }

    /// The connection dropped or the server refused the request.
    pub fn fail_transport(&mut self, message: impl Into<String>) -> Transition {
        if self.state.phase.is_terminal() {
            return Transition::Ignored;
        }
        self.fail(FailureKind::Transport, message)
    }

    fn fail(&mut self, kind: FailureKind, message: impl Into<String>) -> Transition {
        let message = message.into();
        tracing::warn!(generation = %self.id, kind = kind.as_str(), "Generation failed: {}", message);
        self.flush_pending();
        self.state.phase = Phase::Failed { kind, message };
        self.publish();
        Transition::Failed
    }

    fn publish(&self) {
        if self.updates.receiver_count() > 0 {
            self.updates.send_replace(self.state.clone());
        }
    }
}

/// Note text for a progress event; the counter is only shown when the
/// backend sent one.
fn progress_note(message: Option<String>, current: u64, total: u64) -> String {
    let message = message.filter(|m| !m.is_empty());
    match (message, total) {
        (Some(message), 0) => message,
        (Some(message), total) => format!("{} ({}/{})", message, current, total),
        (None, 0) => "processing".to_string(),
        (None, total) => format!("processing {}/{}", current, total),
    }
}

impl Default for StreamReducer {
    fn default() -> Self {
        Self::new()
    }
}
