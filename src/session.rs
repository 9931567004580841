//! Generation sessions.
//!
//! Each user-initiated generation runs as its own tokio task with its own
//! [`StreamReducer`]. A [`Generator`] keeps at most one session in flight:
//! starting a new one aborts the previous task, which drops its reducer and
//! the response body it was reading.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::client::{GenerationRequest, MindmapClient};
use crate::error::{ClientResult, GenerationError};
use crate::reducer::{ReducerState, StreamReducer};

/// Handle to one running generation.
pub struct GenerationSession {
    id: Uuid,
    updates: watch::Receiver<ReducerState>,
    task: Option<JoinHandle<ClientResult<String>>>,
}

impl GenerationSession {
    /// Spawn `run` with a fresh reducer.
    ///
    /// The returned handle observes every state change `run` makes to the
    /// reducer.
    pub fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(StreamReducer) -> Fut,
        Fut: Future<Output = ClientResult<String>> + Send + 'static,
    {
        let reducer = StreamReducer::new();
        let id = reducer.id();
        let updates = reducer.subscribe();
        let task = tokio::spawn(run(reducer));
        tracing::debug!(generation = %id, "Spawned generation");
        Self {
            id,
            updates,
            task: Some(task),
        }
    }

    /// Spawn a generation against the backend.
    pub fn start(client: MindmapClient, request: GenerationRequest) -> Self {
        Self::spawn(move |mut reducer| async move { client.generate(&request, &mut reducer).await })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A receiver that is notified after every reducer mutation.
    pub fn subscribe(&self) -> watch::Receiver<ReducerState> {
        self.updates.clone()
    }

    /// Most recent state published by the reducer.
    pub fn latest(&self) -> ReducerState {
        self.updates.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Stop reading the stream. The reducer is dropped with the task.
    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Wait for the generation to end.
    pub async fn wait(mut self) -> ClientResult<String> {
        let Some(task) = self.task.take() else {
            return Err(GenerationError::Cancelled.into());
        };
        match task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(GenerationError::Cancelled.into()),
            Err(e) => Err(GenerationError::Transport {
                message: format!("generation task failed: {}", e),
            }
            .into()),
        }
    }
}

impl Drop for GenerationSession {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Owner of the single in-flight generation.
#[derive(Default)]
pub struct Generator {
    current: Option<GenerationSession>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `session` the current generation, cancelling the previous one.
    pub fn start(&mut self, session: GenerationSession) -> &GenerationSession {
        if let Some(previous) = self.current.take() {
            if !previous.is_finished() {
                tracing::info!(
                    generation = %previous.id(),
                    "Cancelling previous generation"
                );
            }
            previous.cancel();
        }
        self.current.insert(session)
    }

    pub fn current(&self) -> Option<&GenerationSession> {
        self.current.as_ref()
    }

    /// Take ownership of the current generation, e.g. to wait on it.
    pub fn take(&mut self) -> Option<GenerationSession> {
        self.current.take()
    }
}
