//! [`PageStore`] implementation on top of the SQLite cache database.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{VersionRow, encode_version};
use async_trait::async_trait;
use exn::ResultExt;
use folio_storage::error::{ErrorKind as StorageErrorKind, Result as StorageResult};
use folio_storage::{PageStore, Version, Versions, validate_id};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::instrument;

/// Durable page store backed by the `pages` table.
///
/// Every write is a single upsert statement, so the bytes and the version
/// index entry for an id change together. Concurrent rebuild workers each
/// take a pooled connection; SQLite serializes their writes and the busy
/// timeout absorbs the contention.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    name: String,
    pool: SqlitePool,
}

impl From<&Database> for SqliteStore {
    fn from(db: &Database) -> Self {
        Self::new(db.pool().clone())
    }
}

impl SqliteStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { name: "sqlite".to_string(), pool }
    }

    async fn upsert(&self, id: &str, content: &[u8], version: Version) -> Result<()> {
        sqlx::query(include_str!("../queries/upsert_page.sql"))
            .bind(id)
            .bind(content)
            .bind(encode_version(version)?)
            .bind(OffsetDateTime::now_utc().unix_timestamp())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    async fn content(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as(include_str!("../queries/get_content.sql"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(|(content,)| content))
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/delete_page.sql"))
            .bind(id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn version_index(&self) -> Result<Versions> {
        let rows: Vec<VersionRow> = sqlx::query_as(include_str!("../queries/list_versions.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(<(String, Version)>::try_from).collect()
    }

    async fn row_count(&self) -> Result<usize> {
        let (count,): (i64,) = sqlx::query_as(include_str!("../queries/count_pages.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        usize::try_from(count).or_raise(|| ErrorKind::InvalidData("page count"))
    }
}

#[async_trait]
impl PageStore for SqliteStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(store = %self.name, id = %id, bytes = content.len()))]
    async fn store(&self, id: &str, content: &[u8], version: Version) -> StorageResult<()> {
        let id = validate_id(id)?;
        self.upsert(id, content, version).await.or_raise(|| StorageErrorKind::Backend)
    }

    async fn load(&self, id: &str) -> StorageResult<Vec<u8>> {
        let id = validate_id(id)?;
        match self.content(id).await.or_raise(|| StorageErrorKind::Backend)? {
            Some(content) => Ok(content),
            None => exn::bail!(StorageErrorKind::NotFound(id.to_string())),
        }
    }

    #[instrument(skip_all, fields(store = %self.name, id = %id))]
    async fn delete(&self, id: &str) -> StorageResult<()> {
        let id = validate_id(id)?;
        if !self.remove(id).await.or_raise(|| StorageErrorKind::Backend)? {
            tracing::debug!("Deleting a page that was never stored");
        }
        Ok(())
    }

    async fn versions(&self) -> StorageResult<Versions> {
        self.version_index().await.or_raise(|| StorageErrorKind::Backend)
    }

    async fn count(&self) -> StorageResult<usize> {
        self.row_count().await.or_raise(|| StorageErrorKind::Backend)
    }
}
