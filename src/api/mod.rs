//! Content API access.
//!
//! # Data Flow
//! ```text
//! [api] config section (base_url, headers)
//!     → client.rs (validate once at startup)
//!     → ApiClient (immutable, cloned into call sites)
//!     → ApiRequest (per-request overrides merged over defaults)
//!     → reqwest::Client → content API
//! ```

pub mod client;

use thiserror::Error;

pub use client::{ApiClient, ApiRequest, ClientConfig};

/// Errors raised while configuring or using the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base address is not an absolute http(s) URL.
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A default or per-request header name/value is not valid HTTP.
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    /// The request path does not resolve under the base address.
    #[error("Invalid request path '{0}'")]
    InvalidPath(String),

    /// Transport failure from the underlying HTTP client.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The content API answered with a non-success status.
    #[error("Content API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}
