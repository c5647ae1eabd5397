//! In-memory content provider for testing.

use crate::ContentProvider;
use crate::error::{ErrorKind, Result};
use crate::models::{Item, Section};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    items: Vec<Item>,
    about: Option<Item>,
    content: HashMap<String, Vec<Section>>,
    fail_items: bool,
    fail_about: bool,
    fail_content: HashSet<String>,
    content_calls: HashMap<String, usize>,
}

/// Content provider serving fixed data from memory.
///
/// Every call can be made to fail on demand, and content fetches are counted
/// per id so tests can assert which pages were rebuilt.
#[derive(Default)]
pub struct StaticProvider {
    state: RwLock<State>,
}

impl StaticProvider {
    pub fn new(about: Item) -> Self {
        Self {
            state: RwLock::new(State { about: Some(about), ..State::default() }),
        }
    }

    pub async fn set_items(&self, items: Vec<Item>) {
        self.state.write().await.items = items;
    }

    pub async fn set_about(&self, about: Item) {
        self.state.write().await.about = Some(about);
    }

    pub async fn set_content(&self, id: impl Into<String>, sections: Vec<Section>) {
        self.state.write().await.content.insert(id.into(), sections);
    }

    pub async fn fail_items(&self, fail: bool) {
        self.state.write().await.fail_items = fail;
    }

    pub async fn fail_about(&self, fail: bool) {
        self.state.write().await.fail_about = fail;
    }

    /// Make content fetches for `id` fail (or succeed again).
    pub async fn fail_content(&self, id: impl Into<String>, fail: bool) {
        let id = id.into();
        let mut state = self.state.write().await;
        if fail {
            state.fail_content.insert(id);
        } else {
            state.fail_content.remove(&id);
        }
    }

    /// Number of times content was requested for `id`.
    pub async fn content_calls(&self, id: &str) -> usize {
        self.state.read().await.content_calls.get(id).copied().unwrap_or_default()
    }

    /// Total number of content requests across all ids.
    pub async fn total_content_calls(&self) -> usize {
        self.state.read().await.content_calls.values().sum()
    }
}

#[async_trait]
impl ContentProvider for StaticProvider {
    async fn items(&self) -> Result<Vec<Item>> {
        let state = self.state.read().await;
        if state.fail_items {
            exn::bail!(ErrorKind::Unavailable);
        }
        Ok(state.items.clone())
    }

    async fn about(&self) -> Result<Item> {
        let state = self.state.read().await;
        if state.fail_about {
            exn::bail!(ErrorKind::Unavailable);
        }
        match &state.about {
            Some(about) => Ok(about.clone()),
            None => exn::bail!(ErrorKind::AboutNotFound(0)),
        }
    }

    async fn content(&self, id: &str) -> Result<Vec<Section>> {
        let mut state = self.state.write().await;
        *state.content_calls.entry(id.to_string()).or_default() += 1;
        if state.fail_content.contains(id) {
            exn::bail!(ErrorKind::Unavailable);
        }
        // Items without explicit content render as empty documents.
        Ok(state.content.get(id).cloned().unwrap_or_default())
    }
}
