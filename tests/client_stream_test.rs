// Integration tests for MindmapClient against a mock backend.
// These complement the unit tests in src/client.rs by exercising real HTTP
// streams end to end.

mod common;

use common::*;
use mindmap::client::MindmapClient;
use mindmap::error::{ClientError, FailureKind, GenerationError};
use mindmap::models::{DocumentRequest, TextRequest};
use mindmap::outline::parse_outline;
use mindmap::reducer::{Phase, StreamReducer};
use mindmap::session::GenerationSession;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_text_stream_builds_outline() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_STREAM_ROUTE))
        .and(header("accept", "text/event-stream"))
        .and(body_partial_json(json!({ "content": "photosynthesis notes" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&sample_events())),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let mut reducer = StreamReducer::new();
    let document = client
        .generate_text(TextRequest::new("photosynthesis notes"), &mut reducer)
        .await
        .expect("generation should succeed");

    assert_eq!(document, SAMPLE_OUTLINE);
    assert_eq!(reducer.phase(), &Phase::Complete);
    assert_eq!(reducer.state().notes.len(), 1);

    let tree = reducer.outline();
    assert_eq!(tree.label, "Topic");
    assert_eq!(tree.child_labels(), vec!["A", "B"]);
    assert_eq!(tree.children[0].child_labels(), vec!["a1"]);
}

#[tokio::test]
async fn test_document_stream_sends_pdf_payload() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DOCUMENT_STREAM_ROUTE))
        .and(body_partial_json(json!({
            "doc_type": "pdf",
            "max_depth": 4,
            "title": "paper",
            "content": "JVBERi0=",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&[complete("# Paper\n## Methods")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let mut reducer = StreamReducer::new();
    let request = DocumentRequest::pdf(b"%PDF-")
        .with_title("paper")
        .with_max_depth(4);
    let document = client.generate_document(request, &mut reducer).await.unwrap();

    assert_eq!(document, "# Paper\n## Methods");
    assert_eq!(parse_outline(&document).child_labels(), vec!["Methods"]);
}

#[tokio::test]
async fn test_reasoning_is_kept_out_of_document() {
    let mock_server = MockServer::start().await;
    let body = sse_body(&[
        start("Thinking"),
        reasoning("weighing "),
        generating("<think>options"),
        generating("# Topic\n"),
        complete("# Topic\n"),
    ]);
    mount_stream(&mock_server, TEXT_STREAM_ROUTE, body).await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let mut reducer = StreamReducer::new();
    client
        .generate_text(TextRequest::new("x"), &mut reducer)
        .await
        .unwrap();

    assert_eq!(reducer.document(), "# Topic\n");
    // Completion overwrites reasoning with its own (empty) value.
    assert_eq!(reducer.reasoning(), "");
}

#[tokio::test]
async fn test_backend_error_event_is_application_failure() {
    let mock_server = MockServer::start().await;
    let body = sse_body(&[
        start("Generating"),
        generating("# Half\n"),
        error("model overloaded"),
        generating("## never applied\n"),
    ]);
    mount_stream(&mock_server, TEXT_STREAM_ROUTE, body).await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let mut reducer = StreamReducer::new();
    let err = client
        .generate_text(TextRequest::new("x"), &mut reducer)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Generation(GenerationError::Application { .. })
    ));
    assert_eq!(err.user_message(), "model overloaded");
    assert_eq!(reducer.document(), "# Half\n");
    assert_eq!(
        reducer.phase(),
        &Phase::Failed {
            kind: FailureKind::Application,
            message: "model overloaded".to_string()
        }
    );
}

#[tokio::test]
async fn test_http_error_status_is_transport_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_STREAM_ROUTE))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let mut reducer = StreamReducer::new();
    let err = client
        .generate_text(TextRequest::new("x"), &mut reducer)
        .await
        .unwrap_err();

    match &err {
        ClientError::Status { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "internal error");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert_eq!(err.user_message(), "Processing failed, please try again.");
    assert!(matches!(
        reducer.phase(),
        Phase::Failed {
            kind: FailureKind::Transport,
            ..
        }
    ));
}

#[tokio::test]
async fn test_malformed_frames_are_skipped() {
    let mock_server = MockServer::start().await;
    let body = format!(
        "{}data: {{not json}}\n\n: keep-alive\n\n{}",
        sse_frame(&generating("# Topic\n")),
        sse_frame(&complete("# Topic\n## Child"))
    );
    mount_stream(&mock_server, TEXT_STREAM_ROUTE, body).await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let mut reducer = StreamReducer::new();
    let document = client
        .generate_text(TextRequest::new("x"), &mut reducer)
        .await
        .unwrap();

    assert_eq!(document, "# Topic\n## Child");
    assert_eq!(reducer.state().warnings.len(), 1);
}

#[tokio::test]
async fn test_stream_ending_without_complete_keeps_partial_document() {
    let mock_server = MockServer::start().await;
    let body = sse_body(&[generating("# Topic\n## A\n"), generating("## B")]);
    mount_stream(&mock_server, TEXT_STREAM_ROUTE, body).await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let mut reducer = StreamReducer::new();
    let err = client
        .generate_text(TextRequest::new("x"), &mut reducer)
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(reducer.document(), "# Topic\n## A\n## B");
    assert_eq!(reducer.outline().child_labels(), vec!["A", "B"]);
}

#[tokio::test]
async fn test_unreachable_backend_fails_reducer() {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = MindmapClient::with_base_url("http://127.0.0.1:9");
    let mut reducer = StreamReducer::new();
    let err = client
        .generate_text(TextRequest::new("x"), &mut reducer)
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(
        reducer.phase(),
        Phase::Failed {
            kind: FailureKind::Transport,
            ..
        }
    ));
}

#[tokio::test]
async fn test_session_streams_updates_to_subscribers() {
    let mock_server = MockServer::start().await;
    mount_stream(&mock_server, TEXT_STREAM_ROUTE, sse_body(&sample_events())).await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let session = GenerationSession::start(client, TextRequest::new("x").into());
    let mut updates = session.subscribe();

    let document = session.wait().await.unwrap();
    assert_eq!(document, SAMPLE_OUTLINE);
    assert_eq!(updates.borrow_and_update().phase, Phase::Complete);
}

#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HEALTH_ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&mock_server)
        .await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    assert!(client.health_check().await.unwrap());

    let unhealthy_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HEALTH_ROUTE))
        .respond_with(ResponseTemplate::new(503))
        .mount(&unhealthy_server)
        .await;

    let client = MindmapClient::with_base_url(unhealthy_server.uri());
    assert!(!client.health_check().await.unwrap());
}

#[tokio::test]
async fn test_fetch_json_unwraps_backend_envelope() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/mindmap/from-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": "# Topic",
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/mindmap/from-document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "unsupported document",
        })))
        .mount(&mock_server)
        .await;

    let client = MindmapClient::with_base_url(mock_server.uri());
    let data = client
        .fetch_json("from-text", &TextRequest::new("x"))
        .await
        .unwrap();
    assert_eq!(data, "# Topic");

    let err = client
        .fetch_json("from-document", &DocumentRequest::text("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Backend(ref m) if m == "unsupported document"));
}
