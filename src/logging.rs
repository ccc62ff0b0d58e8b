//! Request logging utilities for the relay
//!
//! Structured logging with short correlation ids so a stream's start, end,
//! and mid-stream failures can be tied together in the logs. Once response
//! headers are out, the log line is the only place a mid-stream failure is
//! distinguishable from a clean completion.

use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Context for tracking a relay request through the system
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Relay branch handling this request
    pub branch: &'static str,
    /// Whether this request streams its response
    pub streaming: bool,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(branch: &'static str, streaming: bool) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            branch,
            streaming,
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            branch = %self.branch,
            streaming = %self.streaming,
            "Relay request started"
        );
    }

    /// Log an upstream failure that happened before any response bytes went out
    pub fn log_upstream_rejected(&self, error: &str) {
        warn!(
            trace_id = %self.trace_id,
            branch = %self.branch,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Upstream call failed before response started"
        );
    }

    /// Log stream started (response headers sent, first bytes flowing)
    pub fn log_stream_started(&self) {
        info!(
            trace_id = %self.trace_id,
            branch = %self.branch,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response started"
        );
    }

    /// Log clean end-of-stream
    pub fn log_stream_ended(&self, chunks: usize) {
        info!(
            trace_id = %self.trace_id,
            branch = %self.branch,
            chunks = %chunks,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response ended"
        );
    }

    /// Log a failure after response headers were already sent
    pub fn log_stream_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            branch = %self.branch,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Stream failed after response headers were sent"
        );
    }

    /// Log successful request completion (buffered branch)
    pub fn log_request_complete(&self) {
        info!(
            trace_id = %self.trace_id,
            branch = %self.branch,
            elapsed_ms = %self.elapsed_ms(),
            "Relay request completed"
        );
    }
}
