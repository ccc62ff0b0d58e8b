//! Upstream service client
//!
//! HTTP client for the AI/professor-data backend the relay forwards to.
//! Failures before a response body starts are surfaced as `Upstream` errors;
//! no retries, no backoff — every failure reaches the caller immediately.

use bytes::Bytes;
use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::pin::Pin;
use tracing::debug;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

/// Stream type for streaming responses from the upstream service
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Upstream service client
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.upstream_api_url.clone(),
        }
    }

    /// Forward a chat request and return the upstream byte stream.
    ///
    /// The stream is handed back exactly as received; the relay forwards it
    /// to the client without interpreting or re-framing the chunks.
    pub async fn chat_stream<T: Serialize>(
        &self,
        request: &T,
        token: &str,
    ) -> AppResult<ByteStream> {
        let url = format!("{}/chat", self.base_url);
        let response = self.post_checked(&url, request, token).await?;

        Ok(Box::pin(response.bytes_stream()))
    }

    /// Forward a link submission and return the buffered JSON body verbatim
    pub async fn submit_link<T: Serialize>(&self, request: &T, token: &str) -> AppResult<Bytes> {
        let url = format!("{}/submit-link", self.base_url);
        let response = self.post_checked(&url, request, token).await?;

        let body = response.bytes().await?;
        Ok(body)
    }

    /// Make a POST request to the upstream service, mapping non-2xx statuses
    /// to an `Upstream` error before any body is consumed
    async fn post_checked<T: Serialize>(
        &self,
        url: &str,
        body: &T,
        token: &str,
    ) -> AppResult<reqwest::Response> {
        debug!(url = %url, "Forwarding request to upstream");

        let response = self
            .client
            .post(url)
            .headers(self.bearer_headers(token)?)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Upstream error {}: {}",
                status, text
            )));
        }

        Ok(response)
    }

    /// Build headers for upstream requests.
    ///
    /// The caller's credential is re-attached verbatim. It is client-supplied,
    /// so header construction is fallible rather than asserted.
    fn bearer_headers(&self, token: &str) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::InvalidToken)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}
