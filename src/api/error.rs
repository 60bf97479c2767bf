//! API client error definitions.

use reqwest::header::InvalidHeaderValue;
use reqwest::StatusCode;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur while building or using the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Reading the token from local storage failed.
    #[error("token lookup failed: {0}")]
    Storage(#[from] StorageError),

    /// Base address or request path does not form a valid URL.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A default header value contains bytes not allowed in HTTP headers.
    #[error("invalid value for header {name}: {source}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: InvalidHeaderValue,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Transport-level failure while sending or reading a request.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
