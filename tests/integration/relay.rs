//! Relay endpoint integration tests
//!
//! Covers request-shape dispatch, bearer handling, upstream error
//! translation, and verbatim relaying on both branches.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{bearer, upstream_mocks, RelayTestHarness};

fn auth_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&bearer()).expect("valid header value"),
    )
}

#[tokio::test]
async fn test_chat_response_is_relayed_unmodified() {
    let harness = RelayTestHarness::new().await;
    upstream_mocks::mock_chat(&harness.upstream, "Hello World").await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"message": "who teaches algorithms?"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "Hello World");

    let content_type = response
        .headers()
        .get("content-type")
        .expect("content-type header")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(content_type, "text/event-stream");

    let cache_control = response
        .headers()
        .get("cache-control")
        .expect("cache-control header")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(cache_control, "no-cache, no-transform");
}

#[tokio::test]
async fn test_chat_forwards_bearer_token_verbatim() {
    let harness = RelayTestHarness::new().await;
    // The mock only matches when the exact Authorization header arrives
    upstream_mocks::mock_chat(&harness.upstream, "ok").await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"message": "hi"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_link_response_is_relayed_byte_for_byte() {
    let harness = RelayTestHarness::new().await;
    // Deliberately odd spacing: the relay must not re-serialize the document
    let upstream_body = r#"{"message":  "Link processing started. Data will be stored shortly."}"#;
    upstream_mocks::mock_submit_link(&harness.upstream, upstream_body).await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"url": "https://example.com/professor/42"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), upstream_body);

    let content_type = response
        .headers()
        .get("content-type")
        .expect("content-type header")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(content_type, "application/json");
}

#[tokio::test]
async fn test_body_with_neither_field_is_rejected_without_upstream_call() {
    let harness = RelayTestHarness::new().await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"question": "who teaches algorithms?"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    assert_eq!(harness.upstream_request_count().await, 0);
}

#[tokio::test]
async fn test_body_with_both_fields_is_rejected_without_upstream_call() {
    let harness = RelayTestHarness::new().await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"message": "hi", "url": "https://example.com"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(harness.upstream_request_count().await, 0);
}

#[tokio::test]
async fn test_blank_message_is_rejected_without_upstream_call() {
    let harness = RelayTestHarness::new().await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"message": "   "}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(harness.upstream_request_count().await, 0);
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let harness = RelayTestHarness::new().await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .text("not json at all")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_missing_authorization_is_rejected_without_upstream_call() {
    let harness = RelayTestHarness::new().await;

    let response = harness
        .server
        .post("/api/proxy")
        .json(&json!({"message": "hi"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(harness.upstream_request_count().await, 0);
}

#[tokio::test]
async fn test_non_bearer_authorization_is_rejected() {
    let harness = RelayTestHarness::new().await;

    let response = harness
        .server
        .post("/api/proxy")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        )
        .json(&json!({"message": "hi"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    assert_eq!(harness.upstream_request_count().await, 0);
}

#[tokio::test]
async fn test_get_method_is_rejected_with_allow_header() {
    let harness = RelayTestHarness::new().await;

    let response = harness.server.get("/api/proxy").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    let allow = response
        .headers()
        .get("allow")
        .expect("allow header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(allow.contains("POST"));
    assert_eq!(harness.upstream_request_count().await, 0);
}

#[tokio::test]
async fn test_chat_upstream_rejection_is_translated_to_bad_gateway() {
    let harness = RelayTestHarness::new().await;
    upstream_mocks::mock_chat_error(&harness.upstream, 500).await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"message": "hi"}))
        .await;

    // Before streaming starts the failure is an ordinary error response,
    // distinguishable from malformed input - never a partial stream
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_link_upstream_rejection_is_translated_to_bad_gateway() {
    let harness = RelayTestHarness::new().await;
    upstream_mocks::mock_submit_link_error(&harness.upstream, 404).await;

    let (name, value) = auth_header();
    let response = harness
        .server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"url": "https://example.com/professor/42"}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_unreachable_upstream_is_translated_to_bad_gateway() {
    // Nothing listens on this port; the connect fails before any stream starts
    let config = crate::common::test_config("http://127.0.0.1:9");
    let state = std::sync::Arc::new(lectern::AppState::new_for_testing(config));
    let server = axum_test::TestServer::new(lectern::routes::create_router(state))
        .expect("Failed to create test server");

    let (name, value) = auth_header();
    let response = server
        .post("/api/proxy")
        .add_header(name, value)
        .json(&json!({"message": "hi"}))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}
