//! In-memory page store.

use super::PageStore;
use crate::error::{ErrorKind, Result};
use crate::id::validate as validate_id;
use crate::{Version, Versions};
use async_trait::async_trait;
use exn::OptionExt;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory page store.
///
/// Each entry holds the version and the bytes together behind a single
/// [`RwLock`], so the version index can never disagree with what is
/// loadable. Used for tests and for running without a database file; the
/// contents are lost when the process exits.
///
/// # Examples
///
/// ```
/// use folio_storage::backend::{MemoryStore, PageStore};
/// use time::OffsetDateTime;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let version = OffsetDateTime::UNIX_EPOCH;
/// let store = MemoryStore::with_pages([("hello", version, b"<p>hi</p>")]);
/// assert_eq!(store.load("hello").await?, b"<p>hi</p>");
///
/// store.store("world", b"<p>there</p>", version).await?;
/// assert_eq!(store.versions().await?.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    name: String,
    pages: RwLock<HashMap<String, (Version, Vec<u8>)>>,
}

impl MemoryStore {
    /// Create a store pre-populated with pages.
    ///
    /// Panics if any id fails validation. If test setup is wrong, then the
    /// test should not pass.
    pub fn with_pages<I, B>(pages: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Version, B)>,
        B: Into<Vec<u8>>,
    {
        let mut map = HashMap::new();
        for (id, version, content) in pages {
            if validate_id(id).is_err() {
                panic!("MemoryStore::with_pages: invalid id {id:?}");
            }
            map.insert(id.to_string(), (version, content.into()));
        }
        Self {
            name: "memory".to_string(),
            pages: RwLock::new(map),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        let pages: [(&str, Version, Vec<u8>); 0] = [];
        Self::with_pages(pages)
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn store(&self, id: &str, content: &[u8], version: Version) -> Result<()> {
        let id = validate_id(id)?;
        self.pages.write().await.insert(id.to_string(), (version, content.to_vec()));
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Vec<u8>> {
        let id = validate_id(id)?;
        let guard = self.pages.read().await;
        let (_version, content) = guard.get(id).ok_or_raise(|| ErrorKind::NotFound(id.to_string()))?;
        Ok(content.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = validate_id(id)?;
        if self.pages.write().await.remove(id).is_none() {
            tracing::debug!(store = %self.name, id, "Deleting a page that was never stored");
        }
        Ok(())
    }

    async fn versions(&self) -> Result<Versions> {
        let guard = self.pages.read().await;
        Ok(guard.iter().map(|(id, (version, _))| (id.clone(), *version)).collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.pages.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use time::OffsetDateTime;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2024-01-01 00:00 UTC);
    const T1: OffsetDateTime = datetime!(2024-02-01 12:30:15.250 UTC);

    #[tokio::test]
    async fn test_store_and_load() {
        let store = MemoryStore::default();
        store.store("hello", b"world", T0).await.unwrap();
        assert_eq!(store.load("hello").await.unwrap(), b"world");
        assert_eq!(store.versions().await.unwrap().get("hello"), Some(&T0));
    }

    #[tokio::test]
    async fn test_store_overwrites_version() {
        let store = MemoryStore::with_pages([("post", T0, b"old".to_vec())]);
        store.store("post", b"new", T1).await.unwrap();
        assert_eq!(store.load("post").await.unwrap(), b"new");
        assert_eq!(store.versions().await.unwrap()["post"], T1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_load_not_found() {
        let store = MemoryStore::default();
        let err = store.load("missing").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_delete_removes_bytes_and_version() {
        let store = MemoryStore::with_pages([("a", T0, b"a".to_vec()), ("b", T0, b"b".to_vec())]);
        store.delete("a").await.unwrap();
        assert!(store.load("a").await.unwrap_err().is_not_found());
        let versions = store.versions().await.unwrap();
        assert!(!versions.contains_key("a"));
        assert!(versions.contains_key("b"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = MemoryStore::default();
        store.delete("never-stored").await.unwrap();
    }

    #[tokio::test]
    async fn test_versions_is_a_detached_copy() {
        let store = MemoryStore::with_pages([("a", T0, b"a".to_vec())]);
        let snapshot = store.versions().await.unwrap();
        store.store("b", b"b", T1).await.unwrap();
        store.delete("a").await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["a"], T0);
    }

    #[tokio::test]
    async fn test_invalid_id_rejected() {
        let store = MemoryStore::default();
        assert!(store.store("../escape", b"bad", T0).await.is_err());
        assert!(store.load("").await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_keep_index_consistent() {
        let store = Arc::new(MemoryStore::default());
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.store(&format!("page-{i}"), format!("{i}").as_bytes(), T1).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let versions = store.versions().await.unwrap();
        assert_eq!(versions.len(), 64);
        for id in versions.keys() {
            assert!(store.load(id).await.is_ok());
        }
    }

    #[test]
    #[should_panic(expected = "invalid id")]
    fn test_with_pages_panics_on_bad_id() {
        MemoryStore::with_pages([("a/b", T0, b"bad".to_vec())]);
    }
}
