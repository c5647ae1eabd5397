//! Construction of the long-lived handles from configuration.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use folio_cache::{Database, SqliteStore};
use folio_config::{Backend, Config};
use folio_library::Reconciler;
use folio_provider::{NotionProvider, ProviderHandle};
use folio_render::Renderer;
use folio_storage::StoreHandle;
use folio_storage::backend::{MemoryStore, ReadOnlyStore};
use std::sync::Arc;

pub struct App {
    pub config: Config,
    pub store: StoreHandle,
    database: Option<Database>,
}

impl App {
    pub async fn open(config: Config) -> Result<Self> {
        let mut database = None;
        let store: StoreHandle = match config.store.backend {
            Backend::Memory => Arc::new(MemoryStore::default()),
            Backend::Sqlite => {
                let db = Database::connect(&config.store.path).await.or_raise(|| ErrorKind::Store)?;
                tracing::debug!(path = %config.store.path.display(), "opened page database");
                let store = SqliteStore::from(&db);
                database = Some(db);
                Arc::new(store)
            },
        };
        let store: StoreHandle =
            if config.reconcile.dry_run { Arc::new(ReadOnlyStore::new(store)) } else { store };
        Ok(Self { config, store, database })
    }

    pub fn reconciler(&self) -> Result<Reconciler> {
        let notion = &self.config.notion;
        let (api_key, database_id) = notion.credentials().or_raise(|| ErrorKind::Config)?;
        let provider: ProviderHandle = Arc::new(
            NotionProvider::new(api_key, database_id)
                .or_raise(|| ErrorKind::Provider)?
                .with_base_url(&notion.base_url)
                .with_version(&notion.version),
        );
        let renderer = Arc::new(Renderer::new().or_raise(|| ErrorKind::Render)?);
        Reconciler::new(provider, Arc::clone(&self.store), renderer, self.config.reconcile.max_workers)
            .or_raise(|| ErrorKind::Config)
    }

    pub async fn close(self) {
        if let Some(db) = self.database {
            db.close().await;
        }
    }
}
