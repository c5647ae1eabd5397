//! HTML rendering of website pages.
//!
//! Pages are rendered from [upon] templates embedded at compile time. Every
//! interpolated value is HTML-escaped by default; templates never receive
//! pre-rendered markup.

mod assets;
mod context;
pub mod error;

use crate::assets::Templates;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use folio_provider::{Item, Section};
use std::fmt::Write;
use tracing::instrument;
use upon::{Engine, Value, fmt as upon_fmt};

const LISTING: &str = "listing.html";
const ITEM: &str = "item.html";
const ABOUT: &str = "about.html";
const NOT_FOUND: &str = "not_found.html";

/// Default formatter: strings are HTML-escaped, everything else is formatted
/// as upon would by default.
fn escape_html(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
    match value {
        Value::String(s) => {
            for c in s.chars() {
                match c {
                    '&' => f.write_str("&amp;")?,
                    '<' => f.write_str("&lt;")?,
                    '>' => f.write_str("&gt;")?,
                    '"' => f.write_str("&quot;")?,
                    '\'' => f.write_str("&#x27;")?,
                    c => f.write_char(c)?,
                }
            }
        },
        v => upon_fmt::default(f, v)?,
    };
    Ok(())
}

/// Renders website pages to HTML bytes.
///
/// All templates compile at construction, so a constructed renderer can only
/// fail on data it cannot format.
pub struct Renderer {
    engine: Engine<'static>,
}
impl Renderer {
    pub fn new() -> Result<Self> {
        let mut engine = Engine::new();
        engine.set_default_formatter(&escape_html);
        for name in Templates::names() {
            let source = Templates::load(&name)?;
            // Compile early so we fail fast in construction.
            engine.add_template(name.clone(), source).or_raise(|| ErrorKind::Template(name))?;
        }
        for required in [LISTING, ITEM, ABOUT, NOT_FOUND] {
            if engine.get_template(required).is_none() {
                exn::bail!(ErrorKind::AssetNotFound(required.to_string()));
            }
        }
        Ok(Self { engine })
    }

    fn render(&self, name: &'static str, context: Value) -> Result<Vec<u8>> {
        let template = self
            .engine
            .get_template(name)
            .ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))?;
        let html = template.render(context).to_string().or_raise(|| ErrorKind::Template(name.to_string()))?;
        Ok(html.into_bytes())
    }

    /// The blog listing: every given item, newest first.
    #[instrument(skip_all, fields(items = items.len()))]
    pub fn listing(&self, items: &[Item]) -> Result<Vec<u8>> {
        self.render(LISTING, upon::value! { title: "Blog", items: context::listing(items)? })
    }

    #[instrument(skip_all, fields(slug = %item.slug))]
    pub fn item(&self, item: &Item, sections: &[Section]) -> Result<Vec<u8>> {
        self.render(
            ITEM,
            upon::value! {
                title: &item.title,
                written_at: context::date(item.written_at)?,
                sections: context::sections(sections),
            },
        )
    }

    #[instrument(skip_all)]
    pub fn about(&self, about: &Item, sections: &[Section]) -> Result<Vec<u8>> {
        self.render(
            ABOUT,
            upon::value! {
                title: &about.title,
                subtitle: &about.excerpt,
                sections: context::sections(sections),
            },
        )
    }

    #[instrument(skip_all)]
    pub fn not_found(&self) -> Result<Vec<u8>> {
        self.render(NOT_FOUND, upon::value! { title: "Page not found" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_provider::{Block, RichText};
    use time::OffsetDateTime;
    use time::macros::date;

    fn html(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    fn item(slug: &str, title: &str) -> Item {
        Item::new(slug, slug, OffsetDateTime::UNIX_EPOCH).with_title(title)
    }

    #[test]
    fn test_not_found() {
        let renderer = Renderer::new().unwrap();
        let page = html(renderer.not_found().unwrap());
        assert!(page.contains("<title>Page not found</title>"));
        assert!(page.contains("href=\"/blog\""));
    }

    #[test]
    fn test_listing_links_every_item() {
        let renderer = Renderer::new().unwrap();
        let items = vec![
            item("first", "First").with_written_at(date!(2024 - 03 - 01)).with_excerpt("an excerpt"),
            item("second", "Second"),
        ];
        let page = html(renderer.listing(&items).unwrap());
        assert!(page.contains("href=\"/blog/first\""));
        assert!(page.contains("href=\"/blog/second\""));
        assert!(page.contains("March 1, 2024"));
        assert!(page.contains("an excerpt"));
        assert!(page.find("/blog/first").unwrap() < page.find("/blog/second").unwrap());
    }

    #[test]
    fn test_empty_listing() {
        let page = html(Renderer::new().unwrap().listing(&[]).unwrap());
        assert!(page.contains("Nothing here yet."));
    }

    #[test]
    fn test_values_are_escaped() {
        let renderer = Renderer::new().unwrap();
        let sections = vec![Section {
            title: String::new(),
            blocks: vec![Block::Paragraph(vec![RichText::plain("<script>alert(1)</script>")])],
        }];
        let page = html(renderer.item(&item("x", "Tom & Jerry"), &sections).unwrap());
        assert!(page.contains("Tom &amp; Jerry"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_escape_formatter() {
        let mut engine = Engine::new();
        engine.set_default_formatter(&escape_html);
        engine.add_template("t", "{{ s }}|{{ n }}|{{ b }}").unwrap();
        let out = engine
            .get_template("t")
            .unwrap()
            .render(upon::value! { s: "<a href=\"x\">Tom & 'Jerry'</a>", n: 42, b: true })
            .to_string()
            .unwrap();
        assert_eq!(out, "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;|42|true");
    }

    #[test]
    fn test_item_sections() {
        let renderer = Renderer::new().unwrap();
        let sections = folio_provider::sections(vec![
            Block::Heading { level: 2, text: "Getting Started".into() },
            Block::Paragraph(vec![
                RichText { bold: true, ..RichText::plain("bold") },
                RichText { link: Some("https://example.com".into()), ..RichText::plain("link") },
            ]),
            Block::Divider,
            Block::BulletedListItem("one".into()),
            Block::BulletedListItem("two".into()),
            Block::Code { language: "rust".into(), text: "let x = 1;".into() },
            Block::Image { url: "https://img.example/a.png".into(), caption: "A".into() },
        ]);
        let page = html(renderer.item(&item("x", "Post"), &sections).unwrap());
        assert!(page.contains("<h2>Getting Started</h2>"));
        assert!(page.contains("id=\"getting-started\""));
        assert!(page.contains("href=\"#getting-started\""));
        assert!(page.contains("<strong>bold</strong>"));
        assert!(page.contains("<a href=\"https://example.com\">link</a>"));
        assert_eq!(page.matches("<ul>").count(), 2, "toc list plus one merged bullet list");
        assert!(page.contains("<li>one</li>"));
        assert!(page.contains("class=\"language-rust\""));
        assert!(page.contains("src=\"https://img.example/a.png\""));
    }

    #[test]
    fn test_about() {
        let renderer = Renderer::new().unwrap();
        let about = item("about_page", "Folio & Co").with_excerpt("I write things");
        let page = html(renderer.about(&about, &[]).unwrap());
        assert!(page.contains("<h1>Folio &amp; Co</h1>"));
        assert!(page.contains("I write things"));
    }
}
