//! Notion-backed content provider.
//!
//! Items live in a single Notion database. Articles are the rows whose `Type`
//! select equals `Article`; the about item is the single row whose `Slug` is
//! the about page id. Item content is the page's block children.

mod wire;

use self::wire::{ApiError, BlockObject, ListResponse, PageObject};
use crate::error::{ErrorKind, Result};
use crate::models::{Item, Section, sections};
use crate::ContentProvider;
use async_trait::async_trait;
use exn::{OptionExt, ResultExt};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";
pub const DEFAULT_VERSION: &str = "2022-06-28";
/// Slug of the database row backing the about page.
pub const ABOUT_SLUG: &str = "about_page";
const TIMEOUT_SECONDS: u64 = 60;
const PAGE_SIZE: usize = 100;

pub struct NotionProvider {
    http: reqwest::Client,
    base_url: String,
    version: String,
    api_key: String,
    database_id: String,
}

impl NotionProvider {
    pub fn new(api_key: impl Into<String>, database_id: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .or_raise(|| ErrorKind::Network)?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_VERSION.to_string(),
            api_key: api_key.into(),
            database_id: database_id.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// API URL for the given path segments, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).or_raise(|| ErrorKind::BaseUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .ok()
            .ok_or_raise(|| ErrorKind::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T> {
        let mut request = self
            .http
            .request(method, self.url(segments)?)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.version);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.or_raise(|| ErrorKind::Network)?;

        let status = response.status();
        if !status.is_success() {
            let error = response.json::<ApiError>().await.unwrap_or(ApiError {
                status: status.as_u16(),
                code: String::new(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
            exn::bail!(ErrorKind::Api {
                status: if error.status == 0 { status.as_u16() } else { error.status },
                code: error.code,
                message: error.message,
            });
        }
        response.json::<T>().await.or_raise(|| ErrorKind::InvalidResponse)
    }

    /// Query the database, following pagination cursors until exhausted.
    async fn query(&self, filter: Value) -> Result<Vec<PageObject>> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut body = json!({ "filter": filter, "page_size": PAGE_SIZE });
            if let Some(cursor) = cursor.take() {
                body["start_cursor"] = Value::String(cursor);
            }
            let list: ListResponse<PageObject> = self
                .request(Method::POST, &["databases", self.database_id.as_str(), "query"], &[], Some(&body))
                .await?;
            pages.extend(list.results);
            match list.next_cursor {
                Some(next) if list.has_more => cursor = Some(next),
                _ => break,
            }
        }
        Ok(pages)
    }
}

#[async_trait]
impl ContentProvider for NotionProvider {
    #[tracing::instrument(skip(self))]
    async fn items(&self) -> Result<Vec<Item>> {
        let filter = json!({ "property": "Type", "select": { "equals": "Article" } });
        let items: Vec<Item> = self.query(filter).await?.into_iter().map(Item::from).collect();
        tracing::debug!(count = items.len(), "fetched items");
        Ok(items)
    }

    #[tracing::instrument(skip(self))]
    async fn about(&self) -> Result<Item> {
        let filter = json!({ "property": "Slug", "rich_text": { "equals": ABOUT_SLUG } });
        let mut pages = self.query(filter).await?;
        if pages.len() != 1 {
            exn::bail!(ErrorKind::AboutNotFound(pages.len()));
        }
        pages.pop().map(Item::from).ok_or_raise(|| ErrorKind::AboutNotFound(0))
    }

    #[tracing::instrument(skip(self))]
    async fn content(&self, id: &str) -> Result<Vec<Section>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page_size = PAGE_SIZE.to_string();
            let mut query = vec![("page_size", page_size.as_str())];
            if let Some(cursor) = cursor.as_deref() {
                query.push(("start_cursor", cursor));
            }
            let list: ListResponse<BlockObject> =
                self.request(Method::GET, &["blocks", id, "children"], &query, None).await?;
            blocks.extend(list.results.into_iter().filter_map(BlockObject::into_block));
            match list.next_cursor {
                Some(next) if list.has_more => cursor = Some(next),
                _ => break,
            }
        }
        Ok(sections(blocks))
    }
}
