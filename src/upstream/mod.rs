//! Upstream service integration
//!
//! Handles request forwarding to the AI/professor-data backend.

pub mod client;

pub use client::{ByteStream, UpstreamClient};
