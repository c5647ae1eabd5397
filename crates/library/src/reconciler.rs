use crate::error::{ErrorKind, Result};
use crate::pass::{Summary, reconcile};
use folio_provider::ProviderHandle;
use folio_render::Renderer;
use folio_storage::StoreHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Runs reconciliation passes against a fixed provider and store.
pub struct Reconciler {
    provider: ProviderHandle,
    store: StoreHandle,
    renderer: Arc<Renderer>,
    max_workers: usize,
}

impl Reconciler {
    pub fn new(provider: ProviderHandle, store: StoreHandle, renderer: Arc<Renderer>, max_workers: usize) -> Result<Self> {
        exn::ensure!(max_workers >= 1, ErrorKind::InvalidWorkers);
        Ok(Self { provider, store, renderer, max_workers })
    }

    /// Run a single pass.
    pub async fn run(&self) -> Result<Summary> {
        reconcile(&self.provider, &self.store, &self.renderer, self.max_workers).await
    }

    /// Run passes every `interval` until `shutdown` resolves.
    ///
    /// The first pass starts immediately. Passes never overlap: a pass that
    /// overruns the interval delays the next tick rather than queueing extra
    /// passes. A failed pass is logged and the loop carries on. Shutdown is
    /// only observed between passes. Returns the number of passes run.
    pub async fn watch(&self, interval: Duration, shutdown: impl Future<Output = ()>) -> usize {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);
        let mut passes = 0;
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!(passes, "shutting down");
                    return passes;
                },
                _ = ticker.tick() => {
                    passes += 1;
                    if let Err(e) = self.run().await {
                        tracing::error!(error = ?e, "reconciliation pass failed");
                    }
                },
            }
        }
    }
}
