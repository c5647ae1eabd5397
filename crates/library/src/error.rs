//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! A reconciliation pass fails in one of two ways. Fatal errors
//! ([`Provider`](ErrorKind::Provider), [`Snapshot`](ErrorKind::Snapshot),
//! [`InvalidWorkers`](ErrorKind::InvalidWorkers)) abort the pass before the
//! store is touched. Everything else is isolated to one page and collected
//! into a single [`Degraded`](ErrorKind::Degraded) error whose children are
//! the individual failures.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not fetch content from provider")]
    Provider,
    #[display("could not read the store's version index")]
    Snapshot,
    #[display("max_workers must be at least 1")]
    InvalidWorkers,
    /// One or more pages failed; every other page was committed.
    #[display("{failed} page operation(s) failed")]
    Degraded { failed: usize },
    #[display("could not render page {_0}")]
    Render(#[error(not(source))] String),
    #[display("could not store page {_0}")]
    Store(#[error(not(source))] String),
    #[display("could not delete page {_0}")]
    Delete(#[error(not(source))] String),
    /// A rebuild worker ended without reporting an outcome (it panicked).
    #[display("rebuild worker for page {_0} exited without reporting")]
    Worker(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider | Self::Snapshot | Self::Degraded { .. } | Self::Store(_) | Self::Delete(_))
    }

    /// The page a per-page failure refers to.
    pub fn page_id(&self) -> Option<&str> {
        match self {
            Self::Render(id) | Self::Store(id) | Self::Delete(id) | Self::Worker(id) => Some(id),
            _ => None,
        }
    }
}
