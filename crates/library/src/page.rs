//! Renderable pages.
//!
//! A [`Page`] is one unit of reconciliation: it has a stable id, a version,
//! can decide from the previous version index whether it needs rebuilding,
//! and can render itself to bytes. Identity, version and staleness never
//! perform I/O; only [`Page::render`] does.

use crate::Context;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use folio_provider::Item;
use folio_storage::{Version, Versions};
use std::collections::HashSet;

/// Id of the blog listing page.
pub const LISTING_PAGE_ID: &str = "blog_page";
/// Id of the about page.
pub const ABOUT_PAGE_ID: &str = "about_page";
/// Id of the not-found page.
pub const NOT_FOUND_PAGE_ID: &str = "404_page";
/// Ids of the singleton pages. Item slugs may not use these.
pub const FIXED_PAGE_IDS: [&str; 3] = [LISTING_PAGE_ID, ABOUT_PAGE_ID, NOT_FOUND_PAGE_ID];

pub fn is_fixed_id(id: &str) -> bool {
    FIXED_PAGE_IDS.contains(&id)
}

#[derive(Debug, Clone)]
pub enum Page {
    /// The blog listing. It has no version of its own: `changed` is decided
    /// from the rest of the desired set when the pass is planned.
    Listing { items: Vec<Item>, version: Version, changed: bool },
    /// One article, identified by its slug and versioned by its last edit.
    Item(Item),
    /// The about page, versioned by its item's last edit.
    About(Item),
    /// Rendered once; only rebuilt if the store loses it.
    NotFound { version: Version },
}

impl Page {
    pub fn id(&self) -> &str {
        match self {
            Self::Listing { .. } => LISTING_PAGE_ID,
            Self::Item(item) => &item.slug,
            Self::About(_) => ABOUT_PAGE_ID,
            Self::NotFound { .. } => NOT_FOUND_PAGE_ID,
        }
    }

    pub fn version(&self) -> Version {
        match self {
            Self::Listing { version, .. } | Self::NotFound { version } => *version,
            Self::Item(item) | Self::About(item) => item.last_edited,
        }
    }

    pub fn is_stale(&self, before: &Versions) -> bool {
        match self {
            Self::Listing { changed, .. } => *changed || !before.contains_key(LISTING_PAGE_ID),
            Self::NotFound { .. } => !before.contains_key(NOT_FOUND_PAGE_ID),
            Self::Item(_) | Self::About(_) => before.get(self.id()) != Some(&self.version()),
        }
    }

    /// Render the page. Item and about pages fetch their content first.
    #[tracing::instrument(skip_all, fields(id = %self.id()))]
    pub async fn render(&self, ctx: &Context) -> Result<Vec<u8>> {
        let id = self.id();
        match self {
            Self::Listing { items, .. } => ctx.renderer.listing(items).or_raise(|| ErrorKind::Render(id.to_string())),
            Self::NotFound { .. } => ctx.renderer.not_found().or_raise(|| ErrorKind::Render(id.to_string())),
            Self::Item(item) => {
                let sections = ctx.provider.content(&item.id).await.or_raise(|| ErrorKind::Render(id.to_string()))?;
                ctx.renderer.item(item, &sections).or_raise(|| ErrorKind::Render(id.to_string()))
            },
            Self::About(about) => {
                let sections = ctx.provider.content(&about.id).await.or_raise(|| ErrorKind::Render(id.to_string()))?;
                ctx.renderer.about(about, &sections).or_raise(|| ErrorKind::Render(id.to_string()))
            },
        }
    }
}

/// Build the desired page set for one pass.
///
/// Items are published under their slug. Items with an empty slug, a slug
/// that is not a valid page id, a slug reserved for a singleton page, or a
/// slug already taken by an earlier item are left out, so ids are unique.
///
/// The listing is marked changed if any item page is stale, or if the set of
/// published item ids differs from the item ids in `before`.
pub fn plan(items: Vec<Item>, about: Item, before: &Versions, now: Version) -> Vec<Page> {
    let mut seen = HashSet::new();
    let mut published = Vec::with_capacity(items.len());
    for item in items {
        if item.slug.is_empty() {
            tracing::debug!(item = %item.id, "skipping item without slug");
            continue;
        }
        if let Err(e) = folio_storage::validate_id(&item.slug) {
            tracing::warn!(item = %item.id, slug = %item.slug, error = %e, "skipping item with invalid slug");
            continue;
        }
        if is_fixed_id(&item.slug) {
            tracing::warn!(item = %item.id, slug = %item.slug, "skipping item whose slug is reserved");
            continue;
        }
        if !seen.insert(item.slug.clone()) {
            tracing::warn!(item = %item.id, slug = %item.slug, "skipping item with duplicate slug");
            continue;
        }
        published.push(item);
    }

    let item_pages: Vec<Page> = published.iter().cloned().map(Page::Item).collect();
    let previous: HashSet<&str> = before.keys().map(String::as_str).filter(|id| !is_fixed_id(id)).collect();
    let current: HashSet<&str> = seen.iter().map(String::as_str).collect();
    let changed = previous != current || item_pages.iter().any(|page| page.is_stale(before));

    let mut pages = item_pages;
    pages.push(Page::About(about));
    pages.push(Page::NotFound { version: now });
    pages.push(Page::Listing { items: published, version: now, changed });
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    const T0: Version = datetime!(2024-01-01 00:00 UTC);
    const T1: Version = datetime!(2024-02-01 00:00 UTC);
    const NOW: Version = datetime!(2024-06-01 00:00 UTC);

    fn item(id: &str, slug: &str, edited: Version) -> Item {
        Item::new(id, slug, edited)
    }

    fn about() -> Item {
        item("about-id", "about_page", T0)
    }

    fn versions(entries: &[(&str, Version)]) -> Versions {
        entries.iter().map(|(id, v)| (id.to_string(), *v)).collect()
    }

    fn all_fixed(at: Version) -> Vec<(&'static str, Version)> {
        FIXED_PAGE_IDS.iter().map(|id| (*id, at)).collect()
    }

    fn listing(pages: &[Page]) -> &Page {
        pages.iter().find(|p| p.id() == LISTING_PAGE_ID).unwrap()
    }

    #[rstest]
    #[case(&[], true)]
    #[case(&[("a", T0)], false)]
    #[case(&[("a", T1)], true)]
    fn test_item_staleness(#[case] before: &[(&str, Version)], #[case] stale: bool) {
        let page = Page::Item(item("1", "a", T0));
        assert_eq!(page.is_stale(&versions(before)), stale);
    }

    #[test]
    fn test_version_equality_ignores_offset() {
        let page = Page::Item(item("1", "a", T0));
        let shifted = T0.to_offset(time::macros::offset!(+2));
        assert!(!page.is_stale(&versions(&[("a", shifted)])));
    }

    #[test]
    fn test_about_keyed_on_fixed_id() {
        let page = Page::About(about());
        assert_eq!(page.id(), ABOUT_PAGE_ID);
        assert!(!page.is_stale(&versions(&[(ABOUT_PAGE_ID, T0)])));
        assert!(page.is_stale(&versions(&[("about-id", T0)])));
    }

    #[test]
    fn test_not_found_staleness_is_identity_only() {
        let page = Page::NotFound { version: NOW };
        assert!(page.is_stale(&Versions::new()));
        assert!(!page.is_stale(&versions(&[(NOT_FOUND_PAGE_ID, T0)])));
    }

    #[test]
    fn test_plan_excludes_unpublishable_items() {
        let items = vec![
            item("a", "a", T0),
            item("b", "", T0),
            item("c", "blog_page", T0),
            item("d", "a", T1),
            item("e", "x/y", T0),
        ];
        let pages = plan(items, about(), &Versions::new(), NOW);
        let ids: Vec<_> = pages.iter().map(Page::id).collect();
        assert_eq!(ids, vec!["a", ABOUT_PAGE_ID, NOT_FOUND_PAGE_ID, LISTING_PAGE_ID]);
        assert_eq!(pages[0].version(), T0);
        let Page::Listing { items, .. } = listing(&pages) else { unreachable!() };
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_listing_unchanged() {
        let mut before = versions(&[("a", T0), ("b", T0)]);
        before.extend(versions(&all_fixed(T0)));
        let pages = plan(vec![item("1", "a", T0), item("2", "b", T0)], about(), &before, NOW);
        assert!(!listing(&pages).is_stale(&before));
    }

    #[test]
    fn test_listing_stale_when_an_item_is_stale() {
        let mut before = versions(&[("a", T0), ("b", T0)]);
        before.extend(versions(&all_fixed(T0)));
        let pages = plan(vec![item("1", "a", T1), item("2", "b", T0)], about(), &before, NOW);
        assert!(listing(&pages).is_stale(&before));
    }

    #[test]
    fn test_listing_stale_on_count_preserving_swap() {
        // "b" replaced by "c" with the same count, and "c" happens to carry a
        // version already present under another id.
        let mut before = versions(&[("a", T0), ("b", T0)]);
        before.extend(versions(&all_fixed(T0)));
        let pages = plan(vec![item("1", "a", T0), item("3", "c", T0)], about(), &before, NOW);
        assert!(listing(&pages).is_stale(&before));
    }

    #[test]
    fn test_listing_stale_when_item_removed() {
        let mut before = versions(&[("a", T0), ("b", T0)]);
        before.extend(versions(&all_fixed(T0)));
        let pages = plan(vec![item("1", "a", T0)], about(), &before, NOW);
        assert!(listing(&pages).is_stale(&before));
    }

    #[test]
    fn test_listing_stale_when_missing_from_store() {
        let before = versions(&[("a", T0), (ABOUT_PAGE_ID, T0), (NOT_FOUND_PAGE_ID, T0)]);
        let pages = plan(vec![item("1", "a", T0)], about(), &before, NOW);
        assert!(listing(&pages).is_stale(&before));
    }

    #[test]
    fn test_about_changes_do_not_touch_listing() {
        let mut before = versions(&[("a", T0)]);
        before.extend(versions(&all_fixed(T0)));
        let pages = plan(vec![item("1", "a", T0)], item("about-id", "", T1), &before, NOW);
        assert!(!listing(&pages).is_stale(&before));
        assert!(pages.iter().find(|p| p.id() == ABOUT_PAGE_ID).unwrap().is_stale(&before));
    }
}
