//! One reconciliation pass.
//!
//! A pass compares the desired page set against a snapshot of the store's
//! version index, rebuilds stale pages on a bounded pool of tasks, deletes
//! pages that left the desired set, then waits for every rebuild it started.

use crate::Context;
use crate::error::{Error, ErrorKind, Result};
use crate::page::{Page, plan};
use exn::{Exn, ResultExt};
use folio_provider::ProviderHandle;
use folio_render::Renderer;
use folio_storage::{StoreHandle, Versions};
use std::collections::HashSet;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{Semaphore, mpsc};
use tracing::instrument;

/// What a pass did. Returned only when every page operation succeeded; a
/// degraded pass logs its summary and returns the aggregate error instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Rebuild tasks started (one per stale page).
    pub launched: usize,
    /// Rebuilds that rendered and stored successfully.
    pub rebuilt: usize,
    /// Failed rebuilds and deletions.
    pub failed: usize,
    /// Pages removed because they left the desired set.
    pub deleted: usize,
    /// Desired pages that were already up to date.
    pub unchanged: usize,
    /// Pages in the store after the pass, if the store could count them.
    pub stored: Option<usize>,
}

/// Outcome reported by a rebuild task.
struct Outcome {
    id: String,
    result: Result<()>,
}

/// Bookkeeping for a single pass. Never outlives the [`reconcile`] call.
pub(crate) struct ReconciliationPass {
    before: Versions,
    after: HashSet<String>,
    launched: HashSet<String>,
    permits: Arc<Semaphore>,
    sender: mpsc::Sender<Outcome>,
    results: mpsc::Receiver<Outcome>,
    failures: Vec<Error>,
    summary: Summary,
}

impl ReconciliationPass {
    pub(crate) fn new(before: Versions, max_workers: usize) -> Self {
        // Capacity matches the pool, so a task that has released its permit
        // can always report without waiting on the drain.
        let (sender, results) = mpsc::channel(max_workers);
        Self {
            before,
            after: HashSet::new(),
            launched: HashSet::new(),
            permits: Arc::new(Semaphore::new(max_workers)),
            sender,
            results,
            failures: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Record the page as desired and, if stale, start rebuilding it.
    pub(crate) fn visit(&mut self, page: Page, ctx: &Arc<Context>, store: &StoreHandle) {
        let id = page.id().to_string();
        self.after.insert(id.clone());
        if !page.is_stale(&self.before) {
            self.summary.unchanged += 1;
            return;
        }
        tracing::debug!(id = %id, version = %page.version(), "page is stale");
        self.launched.insert(id.clone());
        self.summary.launched += 1;

        let permits = Arc::clone(&self.permits);
        let sender = self.sender.clone();
        let ctx = Arc::clone(ctx);
        let store = Arc::clone(store);
        tokio::spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(permit) => {
                    let result = rebuild(&page, &ctx, &store).await;
                    drop(permit);
                    result
                },
                Err(e) => Err(Exn::from(e).raise(ErrorKind::Worker(id.clone()))),
            };
            if sender.send(Outcome { id, result }).await.is_err() {
                tracing::error!("rebuild outcome dropped: pass was cancelled");
            }
        });
    }

    /// Delete every previously stored page that is not in the desired set.
    ///
    /// Runs while rebuilds may still be in flight. Failures are recorded and
    /// do not stop the remaining deletions.
    pub(crate) async fn delete_absent(&mut self, store: &StoreHandle) {
        let mut absent: Vec<String> = self.before.keys().filter(|id| !self.after.contains(*id)).cloned().collect();
        absent.sort();
        for id in absent {
            match store.delete(&id).await.or_raise(|| ErrorKind::Delete(id.clone())) {
                Ok(()) => {
                    tracing::info!(id = %id, "deleted page");
                    self.summary.deleted += 1;
                },
                Err(e) => {
                    tracing::warn!(id = %id, error = ?e, "page deletion failed");
                    self.failures.push(e);
                },
            }
        }
    }

    /// Wait for exactly as many outcomes as rebuilds were launched.
    ///
    /// A task that panics drops its sender without reporting; once every
    /// other task has finished the channel closes and the missing ids are
    /// recorded as worker failures.
    pub(crate) async fn drain(self) -> (Summary, Vec<Error>) {
        let Self { launched, sender, mut results, mut failures, mut summary, .. } = self;
        // Only tasks hold senders from here on.
        drop(sender);

        let mut reported = HashSet::with_capacity(launched.len());
        while reported.len() < launched.len() {
            let Some(Outcome { id, result }) = results.recv().await else {
                break;
            };
            match result {
                Ok(()) => {
                    tracing::debug!(id = %id, "rebuilt page");
                    summary.rebuilt += 1;
                },
                Err(e) => {
                    tracing::warn!(id = %id, error = ?e, "page rebuild failed");
                    failures.push(e);
                },
            }
            reported.insert(id);
        }
        let mut missing: Vec<&String> = launched.difference(&reported).collect();
        missing.sort();
        for id in missing {
            tracing::error!(id = %id, "rebuild worker exited without reporting");
            failures.push(Exn::new(ErrorKind::Worker(id.clone())));
        }
        (summary, failures)
    }
}

/// Log the pass summary and fold failures into one degraded error.
fn conclude(mut summary: Summary, failures: Vec<Error>, stored: Option<usize>) -> Result<Summary> {
    summary.failed = failures.len();
    summary.stored = stored;
    let Summary { launched, rebuilt, failed, deleted, unchanged, .. } = summary;
    tracing::info!(launched, rebuilt, failed, deleted, unchanged, stored, "reconciliation pass complete");
    if failures.is_empty() {
        return Ok(summary);
    }
    Err(Exn::raise_all(ErrorKind::Degraded { failed }, failures))
}

async fn rebuild(page: &Page, ctx: &Context, store: &StoreHandle) -> Result<()> {
    let bytes = page.render(ctx).await?;
    store
        .store(page.id(), &bytes, page.version())
        .await
        .or_raise(|| ErrorKind::Store(page.id().to_string()))
}

/// Run one reconciliation pass.
///
/// Fetches items and the about item from `provider`, snapshots the version
/// index of `store`, rebuilds every stale page with at most `max_workers`
/// rebuilds in flight, and deletes pages that are no longer desired.
///
/// Provider and snapshot failures abort before the store is modified. Any
/// per-page failure is collected: the pass still commits every page that
/// succeeded and returns [`ErrorKind::Degraded`] with one child per failure.
#[instrument(skip_all, fields(store = %store.name(), max_workers = max_workers))]
pub async fn reconcile(
    provider: &ProviderHandle,
    store: &StoreHandle,
    renderer: &Arc<Renderer>,
    max_workers: usize,
) -> Result<Summary> {
    exn::ensure!(max_workers >= 1, ErrorKind::InvalidWorkers);

    let items = provider.items().await.or_raise(|| ErrorKind::Provider)?;
    let about = provider.about().await.or_raise(|| ErrorKind::Provider)?;
    let before = store.versions().await.or_raise(|| ErrorKind::Snapshot)?;
    tracing::debug!(items = items.len(), stored = before.len(), "fetched snapshot");

    let pages = plan(items, about, &before, OffsetDateTime::now_utc());
    let ctx = Arc::new(Context::new(Arc::clone(provider), Arc::clone(renderer)));
    let mut pass = ReconciliationPass::new(before, max_workers);
    for page in pages {
        pass.visit(page, &ctx, store);
    }
    pass.delete_absent(store).await;
    let (summary, failures) = pass.drain().await;

    let stored = match store.count().await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = ?e, "could not count stored pages");
            None
        },
    };
    conclude(summary, failures, stored)
}
