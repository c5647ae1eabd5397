//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No artifact is stored under this id. The serving layer turns this into
    /// a not-found response instead of a server error.
    #[display("page not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// Id is empty, contains control characters, or would escape a single
    /// path segment.
    #[display("invalid page id: {_0:?}")]
    InvalidId(#[error(not(source))] String),
    /// Backend-specific failure; the underlying cause is attached as a child
    /// frame.
    #[display("storage backend error")]
    Backend,
    /// Stored data could not be decoded (corrupt version, wrong type, ...).
    #[display("invalid stored data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend)
    }

    /// Returns `true` for the distinguished [`NotFound`](Self::NotFound) kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
