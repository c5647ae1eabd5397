//! Notion API response bodies, and their mapping onto the domain models.

use crate::models::{Block, Item, RichText};
use serde::Deserialize;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// A paginated list response (database query, block children).
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlainText {
    #[serde(default)]
    pub plain_text: String,
}

fn first(fragments: &[PlainText]) -> String {
    fragments.first().map(|t| t.plain_text.clone()).unwrap_or_default()
}

fn concat(fragments: &[PlainText]) -> String {
    fragments.iter().map(|t| t.plain_text.as_str()).collect()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RichTextProperty {
    #[serde(default)]
    pub rich_text: Vec<PlainText>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TitleProperty {
    #[serde(default)]
    pub title: Vec<PlainText>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DateProperty {
    #[serde(default)]
    pub date: Option<DateValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DateValue {
    pub start: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Properties {
    #[serde(rename = "Slug", default)]
    pub slug: RichTextProperty,
    #[serde(rename = "Title", default)]
    pub title: TitleProperty,
    #[serde(rename = "Excerpt", default)]
    pub excerpt: RichTextProperty,
    #[serde(rename = "WrittenAt", default)]
    pub written_at: DateProperty,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageObject {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_edited_time: OffsetDateTime,
    #[serde(default)]
    pub properties: Properties,
}

fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).ok()
}

impl From<PageObject> for Item {
    fn from(page: PageObject) -> Self {
        let props = page.properties;
        Item {
            id: page.id,
            slug: first(&props.slug.rich_text),
            title: first(&props.title.title),
            excerpt: first(&props.excerpt.rich_text),
            written_at: props.written_at.date.and_then(|d| parse_date(&d.start)),
            last_edited: page.last_edited_time,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub code: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Fragment {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl From<Fragment> for RichText {
    fn from(f: Fragment) -> Self {
        RichText {
            text: f.plain_text,
            bold: f.annotations.bold,
            italic: f.annotations.italic,
            code: f.annotations.code,
            link: f.href,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<PlainText>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ParagraphBlock {
    #[serde(default)]
    pub rich_text: Vec<Fragment>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CodeBlock {
    #[serde(default)]
    pub rich_text: Vec<PlainText>,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileRef {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImageBlock {
    #[serde(default)]
    pub caption: Vec<PlainText>,
    #[serde(default)]
    pub file: Option<FileRef>,
    #[serde(default)]
    pub external: Option<FileRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub heading_1: Option<TextBlock>,
    #[serde(default)]
    pub heading_2: Option<TextBlock>,
    #[serde(default)]
    pub heading_3: Option<TextBlock>,
    #[serde(default)]
    pub bulleted_list_item: Option<TextBlock>,
    #[serde(default)]
    pub quote: Option<TextBlock>,
    #[serde(default)]
    pub paragraph: Option<ParagraphBlock>,
    #[serde(default)]
    pub image: Option<ImageBlock>,
    #[serde(default)]
    pub code: Option<CodeBlock>,
}

impl BlockObject {
    /// `None` for block types with no rendering (or a payload missing its body).
    pub fn into_block(self) -> Option<Block> {
        let heading = |level: u8, body: Option<TextBlock>| {
            body.map(|b| Block::Heading { level, text: concat(&b.rich_text) })
        };
        match self.kind.as_str() {
            "heading_1" => heading(1, self.heading_1),
            "heading_2" => heading(2, self.heading_2),
            "heading_3" => heading(3, self.heading_3),
            "bulleted_list_item" => self.bulleted_list_item.map(|b| Block::BulletedListItem(concat(&b.rich_text))),
            "quote" => self.quote.map(|b| Block::Quote(concat(&b.rich_text))),
            "paragraph" => self
                .paragraph
                .map(|p| Block::Paragraph(p.rich_text.into_iter().map(RichText::from).collect())),
            "image" => self.image.and_then(|image| {
                let caption = concat(&image.caption);
                image.file.or(image.external).map(|f| Block::Image { url: f.url, caption })
            }),
            "code" => self.code.map(|c| Block::Code { language: c.language, text: concat(&c.rich_text) }),
            "divider" => Some(Block::Divider),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    const PAGE: &str = r#"{
        "object": "page",
        "id": "a1b2",
        "last_edited_time": "2024-03-01T10:20:00.000Z",
        "properties": {
            "Slug": {"rich_text": [{"plain_text": "hello-world"}, {"plain_text": "-ignored"}]},
            "Title": {"title": [{"plain_text": "Hello"}]},
            "Excerpt": {"rich_text": []},
            "WrittenAt": {"date": {"start": "2024-02-28"}},
            "Type": {"select": {"name": "Article"}}
        }
    }"#;

    #[test]
    fn test_page_to_item() {
        let page: PageObject = serde_json::from_str(PAGE).unwrap();
        let item = Item::from(page);
        assert_eq!(item.id, "a1b2");
        assert_eq!(item.slug, "hello-world");
        assert_eq!(item.title, "Hello");
        assert_eq!(item.excerpt, "");
        assert_eq!(item.written_at, Some(date!(2024 - 02 - 28)));
        assert_eq!(item.last_edited, datetime!(2024-03-01 10:20 UTC));
    }

    #[test]
    fn test_missing_properties_are_empty() {
        let page: PageObject =
            serde_json::from_str(r#"{"id": "x", "last_edited_time": "2024-01-01T00:00:00Z", "properties": {}}"#)
                .unwrap();
        let item = Item::from(page);
        assert!(item.slug.is_empty());
        assert!(item.written_at.is_none());
    }

    #[test]
    fn test_unparseable_written_at() {
        assert_eq!(parse_date("2024-02-28T10:00:00Z"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2023-12-31"), Some(date!(2023 - 12 - 31)));
    }

    #[test]
    fn test_blocks() {
        let body = r#"{"results": [
            {"type": "heading_2", "heading_2": {"rich_text": [{"plain_text": "Intro"}]}},
            {"type": "paragraph", "paragraph": {"rich_text": [
                {"plain_text": "see ", "annotations": {"bold": true}},
                {"plain_text": "docs", "href": "https://example.com", "annotations": {"code": true}}
            ]}},
            {"type": "divider", "divider": {}},
            {"type": "image", "image": {"caption": [{"plain_text": "cap"}], "external": {"url": "https://img"}}},
            {"type": "code", "code": {"language": "rust", "rich_text": [{"plain_text": "fn main() {}"}]}},
            {"type": "table_of_contents", "table_of_contents": {}}
        ], "has_more": false, "next_cursor": null}"#;
        let list: ListResponse<BlockObject> = serde_json::from_str(body).unwrap();
        let blocks: Vec<_> = list.results.into_iter().filter_map(BlockObject::into_block).collect();
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0], Block::Heading { level: 2, text: "Intro".to_string() });
        let Block::Paragraph(ref fragments) = blocks[1] else {
            panic!("expected paragraph, got {:?}", blocks[1]);
        };
        assert!(fragments[0].bold);
        assert_eq!(fragments[1].link.as_deref(), Some("https://example.com"));
        assert!(fragments[1].code);
        assert_eq!(blocks[2], Block::Divider);
        assert_eq!(blocks[3], Block::Image { url: "https://img".to_string(), caption: "cap".to_string() });
        assert_eq!(blocks[4], Block::Code { language: "rust".to_string(), text: "fn main() {}".to_string() });
    }
}
