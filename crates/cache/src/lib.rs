//! SQLite-backed durable page store.
//!
//! This crate provides the durable [`PageStore`](folio_storage::PageStore)
//! used in production. Rendered pages and their versions live in a single
//! `pages` table, so the version index and the stored bytes are updated
//! together by one statement and cannot drift apart.
//!
//! The database is not the source of truth: the content provider is. If the
//! database is deleted, the next reconciliation pass rebuilds every page.

mod db;
pub mod error;
mod models;
mod store;

pub use crate::db::Database;
pub use crate::store::SqliteStore;
