//! Conversion of provider models into template values.
//!
//! Every block map carries every block-kind key (unset kinds are `none`), so
//! templates can branch with `{% if block.kind %}` without lookup errors.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use folio_provider::{Block, Item, RichText, Section};
use std::cmp::Reverse;
use time::Date;
use time::macros::format_description;
use upon::Value;

pub(crate) fn date(date: Option<Date>) -> Result<Option<String>> {
    date.map(|d| d.format(format_description!("[month repr:long] [day padding:none], [year]")))
        .transpose()
        .or_raise(|| ErrorKind::Format("date"))
}

/// HTML element id for a section title: lowercase alphanumerics joined by `-`.
pub(crate) fn anchor(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Items ordered newest first; undated items last, ties broken by title.
pub(crate) fn listing(items: &[Item]) -> Result<Value> {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by(|a, b| {
        Reverse(a.written_at)
            .cmp(&Reverse(b.written_at))
            .then_with(|| a.title.cmp(&b.title))
    });
    let values = sorted
        .into_iter()
        .map(|item| {
            Ok(upon::value! {
                slug: &item.slug,
                title: &item.title,
                excerpt: &item.excerpt,
                written_at: date(item.written_at)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::List(values))
}

fn span(text: &RichText) -> Value {
    upon::value! {
        text: &text.text,
        bold: text.bold,
        italic: text.italic,
        code: text.code,
        link: text.link.as_deref(),
    }
}

#[derive(Default)]
struct BlockValue {
    heading: Option<Value>,
    paragraph: Option<Value>,
    list: Option<Vec<Value>>,
    quote: Option<String>,
    image: Option<Value>,
    code: Option<Value>,
}
impl From<BlockValue> for Value {
    fn from(b: BlockValue) -> Self {
        upon::value! {
            heading: b.heading,
            paragraph: b.paragraph,
            list: b.list.map(Value::List),
            quote: b.quote,
            image: b.image,
            code: b.code,
        }
    }
}

/// Consecutive bulleted items are merged into a single list block.
fn blocks(blocks: &[Block]) -> Value {
    let mut out: Vec<BlockValue> = Vec::new();
    for block in blocks {
        let value = match block {
            Block::Heading { level, text } => BlockValue {
                heading: Some(upon::value! { level: i64::from(*level), text: text }),
                ..BlockValue::default()
            },
            Block::Paragraph(spans) => BlockValue {
                paragraph: Some(Value::List(spans.iter().map(span).collect())),
                ..BlockValue::default()
            },
            Block::BulletedListItem(text) => {
                if let Some(BlockValue { list: Some(list), .. }) = out.last_mut() {
                    list.push(Value::from(text.as_str()));
                    continue;
                }
                BlockValue { list: Some(vec![Value::from(text.as_str())]), ..BlockValue::default() }
            },
            Block::Quote(text) => BlockValue { quote: Some(text.clone()), ..BlockValue::default() },
            Block::Image { url, caption } => BlockValue {
                image: Some(upon::value! { url: url, caption: caption }),
                ..BlockValue::default()
            },
            Block::Code { language, text } => BlockValue {
                code: Some(upon::value! { language: language, text: text }),
                ..BlockValue::default()
            },
            Block::Divider => continue,
        };
        out.push(value);
    }
    Value::List(out.into_iter().map(Value::from).collect())
}

pub(crate) fn sections(sections: &[Section]) -> Value {
    Value::List(
        sections
            .iter()
            .map(|s| {
                upon::value! {
                    title: &s.title,
                    anchor: anchor(&s.title),
                    blocks: blocks(&s.blocks),
                }
            })
            .collect(),
    )
}
