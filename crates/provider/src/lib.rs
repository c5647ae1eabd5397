//! Content providers.
//!
//! A provider supplies the current truth about the website's content: the
//! list of [items](Item), the singular "about" item, and the structured
//! content of any item by id. Providers are network-backed and every call
//! may fail independently.

pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod models;
pub mod notion;

#[cfg(any(test, feature = "mock"))]
pub use crate::mock::StaticProvider;
pub use crate::models::{Block, Item, RichText, Section, sections};
pub use crate::notion::NotionProvider;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of website content.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// All content items. Items with an empty slug are returned as-is;
    /// filtering is the caller's decision.
    async fn items(&self) -> Result<Vec<Item>>;

    /// The singular item backing the about page.
    async fn about(&self) -> Result<Item>;

    /// The structured content of the item with the given (provider) id,
    /// grouped into [`Section`]s.
    async fn content(&self, id: &str) -> Result<Vec<Section>>;
}

pub type ProviderHandle = Arc<dyn ContentProvider + Send + Sync>;
