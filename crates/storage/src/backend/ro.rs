//! Read-only page store decorator.
//!
//! Wraps another store and prevents write operations from executing, while
//! still indicating success on return. Used for dry-run passes: every stale
//! page is still rendered, but nothing is persisted.

use async_trait::async_trait;

use crate::{PageStore, StoreHandle, Version, Versions, error::Result};

/// Read-only page store.
///
/// Forwards reads to the wrapped store and silently drops all writes and
/// deletions, logging an [`info event`](tracing::Event) for each.
#[derive(Clone)]
pub struct ReadOnlyStore {
    inner: StoreHandle,
}

impl ReadOnlyStore {
    pub fn new(inner: StoreHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PageStore for ReadOnlyStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn store(&self, id: &str, content: &[u8], version: Version) -> Result<()> {
        tracing::info!(id, %version, bytes = content.len(), "Skipping store during read-only mode");
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Vec<u8>> {
        self.inner.load(id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!(id, "Skipping delete during read-only mode");
        Ok(())
    }

    async fn versions(&self) -> Result<Versions> {
        self.inner.versions().await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}
