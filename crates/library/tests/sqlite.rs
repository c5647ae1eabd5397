//! Reconciliation against the durable SQLite store, across reopened databases.

use folio_cache::{Database, SqliteStore};
use folio_library::{ABOUT_PAGE_ID, LISTING_PAGE_ID, NOT_FOUND_PAGE_ID, reconcile};
use folio_provider::{Item, ProviderHandle, StaticProvider};
use folio_render::Renderer;
use folio_storage::{PageStore, StoreHandle};
use std::sync::Arc;
use time::macros::datetime;

async fn open(path: &std::path::Path) -> (Database, StoreHandle) {
    let db = Database::connect(path).await.unwrap();
    let store: StoreHandle = Arc::new(SqliteStore::from(&db));
    (db, store)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_versions_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pages.db");
    let provider = Arc::new(StaticProvider::new(Item::new("about", "about_page", datetime!(2024-01-01 0:00 UTC))));
    provider
        .set_items(vec![
            Item::new("1", "first", datetime!(2024-03-01 12:30:15.123456789 UTC)),
            Item::new("2", "second", datetime!(2024-03-02 0:00 UTC)),
        ])
        .await;
    let handle: ProviderHandle = provider.clone();
    let renderer = Arc::new(Renderer::new().unwrap());

    let (db, store) = open(&path).await;
    let summary = reconcile(&handle, &store, &renderer, 4).await.unwrap();
    assert_eq!(summary.rebuilt, 5);
    db.close().await;

    // Nanosecond versions round-trip, so nothing is stale after reopening.
    let (db, store) = open(&path).await;
    let summary = reconcile(&handle, &store, &renderer, 4).await.unwrap();
    assert_eq!(summary.launched, 0);

    provider.set_items(vec![Item::new("2", "second", datetime!(2024-03-02 0:00 UTC))]).await;
    let summary = reconcile(&handle, &store, &renderer, 4).await.unwrap();
    assert_eq!(summary.deleted, 1);
    let mut ids: Vec<_> = store.versions().await.unwrap().into_keys().collect();
    ids.sort();
    assert_eq!(ids, vec![NOT_FOUND_PAGE_ID, ABOUT_PAGE_ID, LISTING_PAGE_ID, "second"]);
    assert!(store.load("first").await.unwrap_err().is_not_found());
    db.close().await;
}
