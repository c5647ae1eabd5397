use time::{Date, OffsetDateTime};

/// A unit of website content (an article, or the about item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Provider-assigned identifier, used to fetch content.
    pub id: String,
    /// URL-friendly name. Items without a slug are never published.
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Nominal publication date; `None` when unset or unparseable.
    pub written_at: Option<Date>,
    /// When the item's content or metadata last changed.
    pub last_edited: OffsetDateTime,
}

impl Item {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, last_edited: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: String::new(),
            excerpt: String::new(),
            written_at: None,
            last_edited,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_written_at(mut self, written_at: Date) -> Self {
        self.written_at = Some(written_at);
        self
    }
}

/// A fragment of styled inline text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(Vec<RichText>),
    BulletedListItem(String),
    Quote(String),
    Image { url: String, caption: String },
    Code { language: String, text: String },
    /// Section boundary. Never present inside a [`Section`].
    Divider,
}

/// A run of blocks between dividers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Text of the first level-2 heading in the section, if any.
    pub title: String,
    pub blocks: Vec<Block>,
}

/// Split a flat block list into sections at each divider.
///
/// Sections without any blocks (leading, trailing or consecutive dividers)
/// are dropped.
pub fn sections(blocks: impl IntoIterator<Item = Block>) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section::default();
    for block in blocks {
        match block {
            Block::Divider => {
                if !current.blocks.is_empty() {
                    sections.push(std::mem::take(&mut current));
                }
            },
            block => {
                if let Block::Heading { level: 2, text } = &block
                    && current.title.is_empty()
                {
                    current.title = text.clone();
                }
                current.blocks.push(block);
            },
        }
    }
    if !current.blocks.is_empty() {
        sections.push(current);
    }
    sections
}
