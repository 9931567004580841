use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default outline depth requested from the document endpoint.
pub const DEFAULT_MAX_DEPTH: u8 = 3;

/// Kind of source material sent to the document endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Plain text, sent as-is
    #[default]
    Text,
    /// PDF file, sent base64 encoded
    Pdf,
}

/// Request body for `POST /from-text/stream`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextRequest {
    /// The text to build a mindmap from
    pub content: String,
    /// Free-form generation options passed through to the backend
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

impl TextRequest {
    /// Create a request with no extra options
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            options: HashMap::new(),
        }
    }

    /// Attach a generation option
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Request body for `POST /from-document/stream`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRequest {
    /// Text content, or base64 of the file bytes for PDFs
    pub content: String,
    pub doc_type: DocType,
    /// Outline depth, clamped to 1..=5
    pub max_depth: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DocumentRequest {
    /// Build a request for a plain text document
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            doc_type: DocType::Text,
            max_depth: DEFAULT_MAX_DEPTH,
            title: None,
        }
    }

    /// Build a request for a PDF, base64 encoding the raw bytes
    pub fn pdf(bytes: &[u8]) -> Self {
        Self {
            content: STANDARD.encode(bytes),
            doc_type: DocType::Pdf,
            max_depth: DEFAULT_MAX_DEPTH,
            title: None,
        }
    }

    /// Set the document title (usually the uploaded file name)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the outline depth; the backend accepts 1 through 5
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.clamp(1, 5);
        self
    }
}

/// Single JSON body returned by non-streaming endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MindmapResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl MindmapResponse {
    /// Resolve the body into the markdown document or the backend's message.
    ///
    /// A successful body without `data` is treated as an error too, since
    /// there is nothing to render.
    pub fn into_result(self) -> Result<String, String> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(error)) => Err(error),
            (true, None, None) => Err("response contained no mindmap data".to_string()),
            (false, _, None) => Err("mindmap generation failed".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_request_serializes_options() {
        let request = TextRequest::new("hello").with_option("lang", serde_json::json!("en"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["content"], "hello");
        assert_eq!(value["options"]["lang"], "en");
    }

    #[test]
    fn test_document_request_pdf_is_base64() {
        let request = DocumentRequest::pdf(b"%PDF-1.4").with_title("paper.pdf");
        assert_eq!(request.content, "JVBERi0xLjQ=");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["doc_type"], "pdf");
        assert_eq!(value["max_depth"], 3);
        assert_eq!(value["title"], "paper.pdf");
    }

    #[test]
    fn test_document_request_max_depth_is_clamped() {
        assert_eq!(DocumentRequest::text("x").with_max_depth(0).max_depth, 1);
        assert_eq!(DocumentRequest::text("x").with_max_depth(9).max_depth, 5);
        assert_eq!(DocumentRequest::text("x").with_max_depth(4).max_depth, 4);
    }

    #[test]
    fn test_document_request_omits_missing_title() {
        let value = serde_json::to_value(DocumentRequest::text("x")).unwrap();
        assert!(value.get("title").is_none());
        assert_eq!(value["doc_type"], "text");
    }

    #[test]
    fn test_response_into_result() {
        let ok: MindmapResponse =
            serde_json::from_str(r##"{"success": true, "data": "# Topic"}"##).unwrap();
        assert_eq!(ok.into_result(), Ok("# Topic".to_string()));

        let failed: MindmapResponse =
            serde_json::from_str(r#"{"success": false, "error": "quota exceeded"}"#).unwrap();
        assert_eq!(failed.into_result(), Err("quota exceeded".to_string()));

        let empty: MindmapResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(empty.into_result().is_err());
    }
}
