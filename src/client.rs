//! Mindmap API client for backend communication.
//!
//! This module provides the HTTP client for the mindmap generation backend,
//! including streaming generations via server-sent events and the
//! transport-agnostic [`drive_stream`] loop that feeds a response body into a
//! [`StreamReducer`].

use bytes::Bytes;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::fmt::Display;
use std::pin::Pin;

use crate::config::ClientConfig;
use crate::error::{classify_reqwest_error, ClientError, ClientResult};
use crate::models::{DocumentRequest, MindmapResponse, TextRequest};
use crate::reducer::StreamReducer;

/// Streaming endpoint for free text.
pub const TEXT_STREAM_PATH: &str = "from-text/stream";

/// Streaming endpoint for uploaded documents.
pub const DOCUMENT_STREAM_PATH: &str = "from-document/stream";

/// Health endpoint; only the status code matters.
pub const HEALTH_PATH: &str = "health";

/// Response body as a stream of raw chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// One generation request, for either streaming endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    Text(TextRequest),
    Document(DocumentRequest),
}

impl GenerationRequest {
    pub fn path(&self) -> &'static str {
        match self {
            GenerationRequest::Text(_) => TEXT_STREAM_PATH,
            GenerationRequest::Document(_) => DOCUMENT_STREAM_PATH,
        }
    }
}

impl From<TextRequest> for GenerationRequest {
    fn from(request: TextRequest) -> Self {
        GenerationRequest::Text(request)
    }
}

impl From<DocumentRequest> for GenerationRequest {
    fn from(request: DocumentRequest) -> Self {
        GenerationRequest::Document(request)
    }
}

/// Client for the mindmap backend API.
#[derive(Debug, Clone)]
pub struct MindmapClient {
    config: ClientConfig,
    /// Reusable HTTP client
    client: Client,
}

impl MindmapClient {
    /// Create a client with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client for a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::default().with_base_url(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self { config, client }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open the text streaming endpoint.
    pub async fn stream_text(&self, request: &TextRequest) -> ClientResult<ByteStream> {
        self.open_stream(TEXT_STREAM_PATH, request).await
    }

    /// Open the document streaming endpoint.
    pub async fn stream_document(&self, request: &DocumentRequest) -> ClientResult<ByteStream> {
        self.open_stream(DOCUMENT_STREAM_PATH, request).await
    }

    /// POST a request and return the response body as a byte stream.
    ///
    /// A non-success status is returned as [`ClientError::Status`] carrying
    /// the response text.
    async fn open_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ByteStream> {
        let url = self.config.endpoint(path);
        tracing::debug!("Opening stream {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, &url))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::Status { status, message });
        }

        Ok(Box::pin(response.bytes_stream()))
    }

    /// Run a whole generation through `reducer` and return the final
    /// document.
    ///
    /// The reducer is updated live while the body streams in, so callers can
    /// subscribe to it beforehand to render partial outlines. Failures to
    /// open the stream are recorded in the reducer as transport failures.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        reducer: &mut StreamReducer,
    ) -> ClientResult<String> {
        let opened = match request {
            GenerationRequest::Text(body) => self.stream_text(body).await,
            GenerationRequest::Document(body) => self.stream_document(body).await,
        };
        let stream = match opened {
            Ok(stream) => stream,
            Err(err) => {
                reducer.fail_transport(err.to_string());
                return Err(err);
            }
        };

        drive_stream(stream, reducer).await;
        reducer
            .state()
            .result()
            .map(str::to_string)
            .map_err(ClientError::from)
    }

    /// Generate from free text.
    pub async fn generate_text(
        &self,
        request: TextRequest,
        reducer: &mut StreamReducer,
    ) -> ClientResult<String> {
        self.generate(&GenerationRequest::Text(request), reducer).await
    }

    /// Generate from a document (text or base64 PDF).
    pub async fn generate_document(
        &self,
        request: DocumentRequest,
        reducer: &mut StreamReducer,
    ) -> ClientResult<String> {
        self.generate(&GenerationRequest::Document(request), reducer)
            .await
    }

    /// POST to an endpoint that answers with a single
    /// `{ success, data, error }` body.
    pub async fn fetch_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<String> {
        let url = self.config.endpoint(path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, &url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(e, &url))?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: MindmapResponse = serde_json::from_str(&text)?;
        body.into_result().map_err(ClientError::Backend)
    }

    /// Check if the backend is reachable and healthy.
    ///
    /// # Returns
    /// `true` if the health endpoint answers with a 2xx status
    pub async fn health_check(&self) -> ClientResult<bool> {
        let url = self.config.endpoint(HEALTH_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, &url))?;

        Ok(response.status().is_success())
    }
}

impl Default for MindmapClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed a response body into `reducer` until the body ends or a terminal
/// event arrives.
///
/// Reading stops as soon as the reducer reaches a terminal phase; the rest
/// of the body is dropped. A transport error fails the reducer with a
/// transport kind, and a body that ends without a terminal event is handled
/// by [`StreamReducer::finish`].
pub async fn drive_stream<S, E>(mut stream: S, reducer: &mut StreamReducer)
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                reducer.feed_bytes(&chunk);
                if reducer.phase().is_terminal() {
                    tracing::debug!(generation = %reducer.id(), "Terminal event received, closing stream");
                    return;
                }
            }
            Err(e) => {
                reducer.fail_transport(e.to_string());
                return;
            }
        }
    }
    reducer.finish();
}
