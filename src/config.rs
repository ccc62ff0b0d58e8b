//! Configuration management for Lectern
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Base URL of the upstream AI/professor-data service
    pub upstream_api_url: String,

    /// Connect-phase timeout for upstream requests (in seconds)
    pub upstream_connect_timeout_secs: u64,
    /// Idle-read timeout for upstream responses (in seconds). Resets on every
    /// received chunk, so long streams survive as long as they make progress.
    pub upstream_read_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("LECTERN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("LECTERN_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid LECTERN_PORT")?,

            upstream_api_url: env::var("UPSTREAM_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),

            upstream_connect_timeout_secs: env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid UPSTREAM_CONNECT_TIMEOUT_SECS")?,
            upstream_read_timeout_secs: env::var("UPSTREAM_READ_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid UPSTREAM_READ_TIMEOUT_SECS")?,
        })
    }
}
