//! Content model shared by the source client and the renderer.
//!
//! Blocks arrive from the content source as JSON objects whose payload lives
//! under a key named after the block's `type`. They are converted into the
//! closed [`BlockKind`] enum on deserialization, so renderers only ever match
//! on fields that are valid for the variant.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Stable identifier of a block in the content source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id with its `-` separators removed
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A titled page. Immutable for the duration of a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: BlockId,
    pub title: String,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(id),
            title: title.into(),
        }
    }
}

/// Inline style flags on a span. Colour and underline are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// One inline run of styled text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRichText")]
pub struct RichTextSpan {
    /// Raw text content; falls back to the plain text for mentions and equations
    pub text: String,
    pub plain_text: String,
    pub annotations: Annotations,
    pub link: Option<String>,
}

impl RichTextSpan {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            plain_text: text.clone(),
            text,
            annotations: Annotations::default(),
            link: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }
}

#[derive(Deserialize)]
struct RawRichText {
    #[serde(default)]
    plain_text: String,
    #[serde(default)]
    text: Option<RawTextContent>,
    #[serde(default)]
    annotations: Annotations,
}

#[derive(Deserialize)]
struct RawTextContent {
    #[serde(default)]
    content: String,
    #[serde(default)]
    link: Option<RawLink>,
}

#[derive(Deserialize)]
struct RawLink {
    url: String,
}

impl From<RawRichText> for RichTextSpan {
    fn from(raw: RawRichText) -> Self {
        let (text, link) = match raw.text {
            Some(content) => (content.content, content.link.map(|l| l.url)),
            None => (raw.plain_text.clone(), None),
        };
        Self {
            text,
            plain_text: raw.plain_text,
            annotations: raw.annotations,
            link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    /// Markdown ATX marker for this level
    pub fn marker(self) -> &'static str {
        match self {
            HeadingLevel::One => "#",
            HeadingLevel::Two => "##",
            HeadingLevel::Three => "###",
        }
    }
}

/// Type-specific payload of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph {
        rich_text: Vec<RichTextSpan>,
    },
    Heading {
        level: HeadingLevel,
        rich_text: Vec<RichTextSpan>,
    },
    BulletedListItem {
        rich_text: Vec<RichTextSpan>,
    },
    NumberedListItem {
        rich_text: Vec<RichTextSpan>,
    },
    Code {
        language: String,
        rich_text: Vec<RichTextSpan>,
    },
    /// Any tag the source defines that has no Markdown rendering here
    Unsupported(String),
}

impl BlockKind {
    /// The source's type tag for this variant
    pub fn type_tag(&self) -> &str {
        match self {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading {
                level: HeadingLevel::One,
                ..
            } => "heading_1",
            BlockKind::Heading {
                level: HeadingLevel::Two,
                ..
            } => "heading_2",
            BlockKind::Heading {
                level: HeadingLevel::Three,
                ..
            } => "heading_3",
            BlockKind::BulletedListItem { .. } => "bulleted_list_item",
            BlockKind::NumberedListItem { .. } => "numbered_list_item",
            BlockKind::Code { .. } => "code",
            BlockKind::Unsupported(tag) => tag,
        }
    }
}

/// One node of the content tree. Children are fetched lazily by id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub has_children: bool,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: BlockId::new(id),
            has_children: false,
            kind,
        }
    }

    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }
}

#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(default)]
    has_children: bool,
    #[serde(rename = "type")]
    tag: String,
    #[serde(flatten)]
    payloads: Map<String, Value>,
}

#[derive(Deserialize)]
struct TextPayload {
    #[serde(default)]
    rich_text: Vec<RichTextSpan>,
}

#[derive(Deserialize)]
struct CodePayload {
    #[serde(default)]
    rich_text: Vec<RichTextSpan>,
    #[serde(default)]
    language: String,
}

impl RawBlock {
    fn payload<T: serde::de::DeserializeOwned>(&mut self) -> Result<T, String> {
        let value = self.payloads.remove(&self.tag).unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| format!("invalid `{}` payload on block {}: {e}", self.tag, self.id))
    }

    fn rich_text(&mut self) -> Result<Vec<RichTextSpan>, String> {
        self.payload::<TextPayload>().map(|p| p.rich_text)
    }
}

impl TryFrom<RawBlock> for Block {
    type Error = String;

    fn try_from(mut raw: RawBlock) -> Result<Self, Self::Error> {
        let tag = raw.tag.clone();
        let kind = match tag.as_str() {
            "paragraph" => BlockKind::Paragraph {
                rich_text: raw.rich_text()?,
            },
            "heading_1" => BlockKind::Heading {
                level: HeadingLevel::One,
                rich_text: raw.rich_text()?,
            },
            "heading_2" => BlockKind::Heading {
                level: HeadingLevel::Two,
                rich_text: raw.rich_text()?,
            },
            "heading_3" => BlockKind::Heading {
                level: HeadingLevel::Three,
                rich_text: raw.rich_text()?,
            },
            "bulleted_list_item" => BlockKind::BulletedListItem {
                rich_text: raw.rich_text()?,
            },
            "numbered_list_item" => BlockKind::NumberedListItem {
                rich_text: raw.rich_text()?,
            },
            "code" => {
                let code: CodePayload = raw.payload()?;
                BlockKind::Code {
                    language: code.language,
                    rich_text: code.rich_text,
                }
            }
            other => BlockKind::Unsupported(other.to_string()),
        };

        Ok(Block {
            id: raw.id,
            has_children: raw.has_children,
            kind,
        })
    }
}
