//! Provider Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A provider error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[display("network error")]
    Network,
    /// The content API answered with an error status.
    #[display("content API error {status} ({code}): {message}")]
    Api { status: u16, code: String, message: String },
    /// The response body did not match the expected shape.
    #[display("invalid response from content API")]
    InvalidResponse,
    /// The about item query must match exactly one item.
    #[display("expected exactly one about item, found {_0}")]
    AboutNotFound(#[error(not(source))] usize),
    /// The configured API base URL cannot have path segments appended.
    #[display("invalid API base URL: {_0}")]
    BaseUrl(#[error(not(source))] String),
    /// The provider is deliberately unavailable (test providers only).
    #[display("content source unavailable")]
    Unavailable,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::Unavailable => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
