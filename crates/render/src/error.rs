//! Render Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An embedded template was missing or not valid UTF-8.
    #[display("template asset not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    /// A template failed to compile or render.
    #[display("template error in {_0}")]
    Template(#[error(not(source))] String),
    /// A value could not be formatted for display.
    #[display("could not format {_0}")]
    Format(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Rendering is deterministic: the same input fails the same way.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
