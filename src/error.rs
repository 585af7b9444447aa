//! Error taxonomy for request handling.
//!
//! Three classes of failure flow through the pipeline:
//! - `BadRequest` / `NotFound`: recoverable client errors, surfaced as 4xx JSON.
//! - `Serialize` / `Internal`: unexpected failures, caught by the error-boundary
//!   step and translated into a generic 500.
//!
//! An unmatched route is *not* an error; the router responds 404 through a
//! terminal not-found step instead.

use thiserror::Error;

/// Error raised by handlers and pipeline steps.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or invalid state transition. Message is shown to the client.
    #[error("{0}")]
    BadRequest(String),

    /// Requested resource does not exist. Message is shown to the client.
    #[error("{0}")]
    NotFound(String),

    /// Response payload failed to serialize.
    #[error("response serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Anything unanticipated. The client only sees a generic message.
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
