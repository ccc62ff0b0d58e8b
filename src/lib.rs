//! Lectern - streaming relay for the professor-chat assistant
//!
//! This library provides the core functionality for the Lectern relay
//! server. It accepts authenticated chat and link-submission requests and
//! forwards them to the upstream AI backend, streaming the response through
//! when upstream streams.

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod upstream;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};
pub use crate::upstream::UpstreamClient;

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Client for the upstream AI/professor-data service
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Connection-pooled HTTP client. Only the connect and idle-read
        // phases are bounded: a total-duration timeout would cut off healthy
        // long-running streams.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .connect_timeout(std::time::Duration::from_secs(
                config.upstream_connect_timeout_secs,
            ))
            .read_timeout(std::time::Duration::from_secs(
                config.upstream_read_timeout_secs,
            ))
            .build()?;

        let upstream = Arc::new(UpstreamClient::new(http_client, &config));

        Ok(Self {
            config,
            start_time: Instant::now(),
            upstream,
        })
    }

    /// Create application state for testing against a mock upstream
    ///
    /// Uses a plain HTTP client so tests control timing themselves.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(config: Config) -> Self {
        let upstream = Arc::new(UpstreamClient::new(reqwest::Client::new(), &config));

        Self {
            config,
            start_time: Instant::now(),
            upstream,
        }
    }
}
