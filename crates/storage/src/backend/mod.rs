//! Page store trait and in-process implementations.
//!
//! This module defines the [`PageStore`] trait, the contract the
//! reconciliation engine consumes, plus the backends that need nothing but
//! the process itself. The durable SQLite backend lives in `folio-cache`.

mod memory;
mod ro;

pub use self::memory::MemoryStore;
pub use self::ro::ReadOnlyStore;
use crate::error::Result;
use crate::{Version, Versions};
use async_trait::async_trait;

/// Unified interface for versioned page stores.
///
/// A store keeps the rendered bytes of each page alongside the version it was
/// rendered from. Rebuild workers call [`store`](Self::store) concurrently
/// with each other, so implementations must be safe to share between tasks
/// and must keep the version index consistent under concurrent writers.
///
/// # Examples
///
/// ```
/// use folio_storage::{PageStore, error::Result};
///
/// async fn size_of_page(store: &dyn PageStore, id: &str) -> Result<usize> {
///     match store.load(id).await {
///         Ok(bytes) => Ok(bytes.len()),
///         Err(e) if e.is_not_found() => Ok(0),
///         Err(e) => Err(e),
///     }
/// }
/// ```
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// Durably upsert a page.
    ///
    /// Once this returns `Ok`, the page's bytes are retrievable and the
    /// version index maps `id` to `version`; a subsequent
    /// [`versions()`](Self::versions) call must observe both.
    async fn store(&self, id: &str, content: &[u8], version: Version) -> Result<()>;

    /// Load the bytes of a stored page.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if no page is
    /// stored under `id`.
    async fn load(&self, id: &str) -> Result<Vec<u8>>;

    /// Remove a page's bytes and its version index entry.
    ///
    /// Deleting an id that isn't stored is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Point-in-time copy of the version index.
    ///
    /// The copy is detached from the store: writes performed after this
    /// returns are not reflected in it.
    async fn versions(&self) -> Result<Versions>;

    /// Number of pages currently stored.
    ///
    /// Default implementation counts the entries of
    /// [`versions()`](Self::versions).
    async fn count(&self) -> Result<usize> {
        Ok(self.versions().await?.len())
    }
}
