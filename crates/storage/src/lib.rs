//! Versioned page storage.
//!
//! A store is a durable `id → bytes` map with an auxiliary `id → version`
//! index. The index is the only thing the reconciliation engine trusts about
//! what is currently persisted, so every backend must guarantee that an id
//! appears in [`PageStore::versions`] if, and only if, its bytes can be
//! [loaded](PageStore::load).

pub mod backend;
pub mod error;
mod id;

pub use crate::backend::PageStore;
pub use crate::id::validate as validate_id;
use std::collections::HashMap;
use std::sync::Arc;

/// The version a page was stored with. Compared for exact equality only.
pub type Version = time::OffsetDateTime;
/// Point-in-time copy of a store's version index.
pub type Versions = HashMap<String, Version>;

pub type StoreHandle = Arc<dyn PageStore + Send + Sync>;
