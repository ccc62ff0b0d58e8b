//! Authentication middleware
//!
//! Extracts the caller's bearer credential and hands it to the relay
//! untouched. Verifying the token belongs to the upstream service; the relay
//! only refuses to issue upstream calls for requests that carry no
//! credential at all.

use axum::{
    extract::Request,
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::AppError;

/// Opaque bearer credential supplied by the caller.
///
/// The relay never inspects the token's contents; it is re-attached verbatim
/// to the upstream request.
#[derive(Debug, Clone)]
pub struct CallerToken(String);

impl CallerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extract the Authorization header value and return the bearer token
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    if auth_header.starts_with("Bearer ") {
        Some(&auth_header[7..])
    } else {
        None
    }
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Rejects requests with a missing or malformed header before any
///    upstream call is issued
/// 3. Adds CallerToken to request extensions for the relay handler
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    // Non-POST requests must reach the method router's 405 fallback un-gated
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = extract_bearer_token(auth_header)
        .ok_or(AppError::InvalidToken)?
        .to_owned();
    if token.is_empty() {
        return Err(AppError::InvalidToken);
    }

    debug!(path = %request.uri().path(), "Caller presented bearer credential");

    request
        .extensions_mut()
        .insert(CallerToken::new(token));

    Ok(next.run(request).await)
}
