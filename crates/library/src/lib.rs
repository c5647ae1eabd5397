//! Pages and the reconciliation engine.
//!
//! [`reconcile`] keeps a [`PageStore`](folio_storage::PageStore) in sync with
//! a [`ContentProvider`](folio_provider::ContentProvider): stale pages are
//! rebuilt under bounded concurrency, pages that disappeared are deleted, and
//! every per-page failure is reported in one aggregate error.

pub mod error;
mod page;
mod pass;
mod reconciler;

pub use crate::page::{ABOUT_PAGE_ID, FIXED_PAGE_IDS, LISTING_PAGE_ID, NOT_FOUND_PAGE_ID, Page, is_fixed_id, plan};
pub use crate::pass::{Summary, reconcile};
pub use crate::reconciler::Reconciler;
use folio_provider::ProviderHandle;
use folio_render::Renderer;
use std::sync::Arc;

/// Everything a page needs to render itself.
pub struct Context {
    pub provider: ProviderHandle,
    pub renderer: Arc<Renderer>,
}
impl Context {
    pub fn new(provider: ProviderHandle, renderer: Arc<Renderer>) -> Self {
        Self { provider, renderer }
    }
}
