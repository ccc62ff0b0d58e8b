//! Relay endpoint
//!
//! The single proxy route between the chat UI and the upstream service.
//! A request body carries exactly one of `message` or `url`: the chat branch
//! streams the upstream response through unmodified, the link branch relays
//! a buffered JSON document.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    logging::RequestContext,
    middleware::auth::CallerToken,
    routes::metrics::{record_request, record_stream_failure},
    AppState,
};

/// Chat request, forwarded to the upstream `/chat` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    pub message: String,
}

/// Link submission, forwarded to the upstream `/submit-link` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkSubmission {
    pub url: String,
}

/// Inbound request body: exactly one of `message` or `url`.
///
/// `deny_unknown_fields` on the variants makes dispatch deterministic: a body
/// carrying both fields, or any extra field, matches neither variant and is
/// rejected instead of guessed at.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RelayRequest {
    Chat(ChatRequest),
    Link(LinkSubmission),
}

impl RelayRequest {
    /// Reject bodies whose single field is present but blank
    fn validate(&self) -> Result<(), AppError> {
        let value = match self {
            RelayRequest::Chat(req) => &req.message,
            RelayRequest::Link(req) => &req.url,
        };
        if value.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Request body must carry a non-empty `message` or `url`".to_string(),
            ));
        }
        Ok(())
    }
}

/// Handle relay requests
///
/// Dispatches on the validated body shape: chat messages open a streaming
/// pass-through to the upstream chat endpoint, link submissions perform a
/// buffered JSON exchange. The caller's bearer credential is forwarded on
/// both branches. Nothing is sent upstream until the body has validated.
pub async fn relay(
    State(state): State<Arc<AppState>>,
    request: axum::extract::Request,
) -> Result<Response, AppError> {
    let start_time = Instant::now();

    // The auth middleware placed the caller's credential in extensions
    let token = request
        .extensions()
        .get::<CallerToken>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read request body: {}", e)))?;

    let relay_request: RelayRequest = serde_json::from_slice(&body).map_err(|_| {
        AppError::InvalidRequest(
            "Request body must be exactly one of {\"message\": ...} or {\"url\": ...}".to_string(),
        )
    })?;
    relay_request.validate()?;

    match relay_request {
        RelayRequest::Chat(chat) => handle_chat(state, token, chat, start_time).await,
        RelayRequest::Link(link) => handle_link(state, token, link, start_time).await,
    }
}

/// Handle the streaming chat branch
async fn handle_chat(
    state: Arc<AppState>,
    token: CallerToken,
    request: ChatRequest,
    start_time: Instant,
) -> Result<Response, AppError> {
    let ctx = RequestContext::new("chat", true);
    ctx.log_request_start();

    let mut upstream = match state.upstream.chat_stream(&request, token.as_str()).await {
        Ok(stream) => stream,
        Err(e) => {
            ctx.log_upstream_rejected(&e.to_string());
            record_request("error", "chat", start_time.elapsed().as_secs_f64());
            return Err(e);
        }
    };

    ctx.log_stream_started();
    record_request("streaming", "chat", start_time.elapsed().as_secs_f64());

    // Copy bytes to the client exactly as they arrive from upstream: same
    // order, no buffering, no re-framing. A failure mid-stream cannot undo
    // the 200 already sent; yielding the error aborts the client connection
    // instead of faking a clean end-of-stream.
    let forwarded = async_stream::stream! {
        let mut chunks = 0usize;
        while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(bytes) => {
                    chunks += 1;
                    yield Ok(bytes);
                }
                Err(e) => {
                    ctx.log_stream_error(&e.to_string());
                    record_stream_failure("chat");
                    yield Err(AppError::Stream(e.to_string()));
                    return;
                }
            }
        }
        ctx.log_stream_ended(chunks);
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header(header::CONNECTION, "keep-alive")
        .header("X-Accel-Buffering", "no")
        .body(Body::from_stream(forwarded))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Handle the buffered link-submission branch
async fn handle_link(
    state: Arc<AppState>,
    token: CallerToken,
    request: LinkSubmission,
    start_time: Instant,
) -> Result<Response, AppError> {
    let ctx = RequestContext::new("link", false);
    ctx.log_request_start();

    let body = match state.upstream.submit_link(&request, token.as_str()).await {
        Ok(body) => body,
        Err(e) => {
            ctx.log_upstream_rejected(&e.to_string());
            record_request("error", "link", start_time.elapsed().as_secs_f64());
            return Err(e);
        }
    };

    record_request("success", "link", start_time.elapsed().as_secs_f64());
    ctx.log_request_complete();

    // The upstream JSON document is relayed byte-for-byte
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))?;

    Ok(response)
}
