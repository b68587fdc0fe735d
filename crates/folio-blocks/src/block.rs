//! Typed block payloads.
//!
//! Every [`Node`](crate::Node) carries one [`Block`]: a variant per known
//! block type, plus [`Block::Unsupported`] for anything else. Payload
//! structs model the fields the pipeline reads; all remaining keys are kept
//! verbatim in each payload's `extra` map so nothing is lost on a cache
//! round trip.
//!
//! Fields that decode to an empty default (captions, `checked: false`, ...)
//! are skipped on serialization, so a payload with such a key removed stays
//! without it after a decode and encode cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rich_text::RichText;

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// Payload of text-bearing blocks (paragraphs, headings, list items, quotes,
/// toggles).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextBlock {
    pub fn new(rich_text: Vec<RichText>) -> Self {
        Self {
            rich_text,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToDoBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalloutBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Block or page icon: an emoji, or an image by URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<FileUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileUrl>,
}

impl Icon {
    /// Image URL for non-emoji icons.
    pub fn url(&self) -> Option<&str> {
        self.external
            .as_ref()
            .or(self.file.as_ref())
            .map(|f| f.url.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EquationBlock {
    pub expression: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where a media payload's bytes live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Hosted by the content API (signed, expiring URL).
    #[default]
    File,
    /// Linked from an external site.
    External,
    #[serde(other)]
    Other,
}

/// URL reference inside a media payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

/// Payload of image, video, audio, file and pdf blocks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaBlock {
    #[serde(rename = "type")]
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<FileUrl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaBlock {
    /// Media hosted by the content API.
    pub fn hosted(url: impl Into<String>) -> Self {
        Self {
            source: SourceKind::File,
            file: Some(FileUrl {
                url: url.into(),
                expiry_time: None,
            }),
            ..Self::default()
        }
    }

    /// Media linked from an external URL.
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            source: SourceKind::External,
            external: Some(FileUrl {
                url: url.into(),
                expiry_time: None,
            }),
            ..Self::default()
        }
    }

    /// Current URL of the media, following the source kind.
    pub fn url(&self) -> Option<&str> {
        match self.source {
            SourceKind::File => self.file.as_ref(),
            SourceKind::External => self.external.as_ref(),
            SourceKind::Other => None,
        }
        .map(|f| f.url.as_str())
    }

    /// Point the media at a new URL, keeping the source kind.
    ///
    /// Returns `false` when the payload has no URL slot to rewrite.
    pub fn set_url(&mut self, url: String) -> bool {
        let slot = match self.source {
            SourceKind::File => self.file.as_mut(),
            SourceKind::External => self.external.as_mut(),
            SourceKind::Other => None,
        };
        match slot {
            Some(file_url) => {
                file_url.url = url;
                file_url.expiry_time = None;
                true
            }
            None => false,
        }
    }
}

/// Payload of bookmark, embed and link preview blocks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkBlock {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<RichText>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub table_width: usize,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_column_header: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_row_header: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A table row: one rich text sequence per cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRowBlock {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<Vec<RichText>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of child page and child database blocks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleBlock {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of structural blocks whose content is entirely their children
/// (dividers, columns, synced blocks, ...).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainBlock {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

macro_rules! block_kinds {
    ($($variant:ident($payload:ty) => $name:literal,)+) => {
        /// Type-specific content of a node.
        #[derive(Clone, Debug, PartialEq)]
        pub enum Block {
            $($variant($payload),)+
            /// Any block type not modeled above, with its raw payload.
            Unsupported { kind: String, payload: Value },
        }

        impl Block {
            /// Source type name (`"paragraph"`, `"heading_1"`, ...).
            pub fn kind(&self) -> &str {
                match self {
                    $(Self::$variant(_) => $name,)+
                    Self::Unsupported { kind, .. } => kind,
                }
            }

            /// Build a block from its type name and raw payload.
            ///
            /// Unknown types, and known types whose payload does not match
            /// the modeled shape, become [`Block::Unsupported`].
            pub fn from_payload(kind: &str, payload: Value) -> Self {
                let parsed = match kind {
                    $($name => <$payload>::deserialize(&payload).map(Self::$variant),)+
                    _ => {
                        return Self::Unsupported {
                            kind: kind.to_owned(),
                            payload,
                        };
                    }
                };
                parsed.unwrap_or_else(|err| {
                    tracing::debug!("payload of {kind} block not recognized: {err}");
                    Self::Unsupported {
                        kind: kind.to_owned(),
                        payload,
                    }
                })
            }

            /// Serialize the payload back to its raw form.
            pub fn to_payload(&self) -> Result<Value, serde_json::Error> {
                match self {
                    $(Self::$variant(payload) => serde_json::to_value(payload),)+
                    Self::Unsupported { payload, .. } => Ok(payload.clone()),
                }
            }
        }
    };
}

block_kinds! {
    Paragraph(TextBlock) => "paragraph",
    Heading1(TextBlock) => "heading_1",
    Heading2(TextBlock) => "heading_2",
    Heading3(TextBlock) => "heading_3",
    BulletedListItem(TextBlock) => "bulleted_list_item",
    NumberedListItem(TextBlock) => "numbered_list_item",
    Quote(TextBlock) => "quote",
    Toggle(TextBlock) => "toggle",
    ToDo(ToDoBlock) => "to_do",
    Callout(CalloutBlock) => "callout",
    Code(CodeBlock) => "code",
    Equation(EquationBlock) => "equation",
    Image(MediaBlock) => "image",
    Video(MediaBlock) => "video",
    Audio(MediaBlock) => "audio",
    File(MediaBlock) => "file",
    Pdf(MediaBlock) => "pdf",
    Bookmark(LinkBlock) => "bookmark",
    Embed(LinkBlock) => "embed",
    LinkPreview(LinkBlock) => "link_preview",
    Divider(PlainBlock) => "divider",
    Breadcrumb(PlainBlock) => "breadcrumb",
    Table(TableBlock) => "table",
    TableRow(TableRowBlock) => "table_row",
    ColumnList(PlainBlock) => "column_list",
    Column(PlainBlock) => "column",
    SyncedBlock(PlainBlock) => "synced_block",
    TableOfContents(PlainBlock) => "table_of_contents",
    ChildPage(TitleBlock) => "child_page",
    ChildDatabase(TitleBlock) => "child_database",
}

impl Block {
    /// Heading level (1-3) for heading blocks.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Self::Heading1(_) => Some(1),
            Self::Heading2(_) => Some(2),
            Self::Heading3(_) => Some(3),
            _ => None,
        }
    }

    /// Rich text of text-bearing blocks.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b)
            | Self::Quote(b)
            | Self::Toggle(b) => Some(&b.rich_text),
            Self::ToDo(b) => Some(&b.rich_text),
            Self::Callout(b) => Some(&b.rich_text),
            Self::Code(b) => Some(&b.rich_text),
            _ => None,
        }
    }

    /// Whether this is a bulleted or numbered list item.
    pub fn is_list_item(&self) -> bool {
        matches!(self, Self::BulletedListItem(_) | Self::NumberedListItem(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_paragraph_from_payload() {
        let block = Block::from_payload(
            "paragraph",
            json!({ "rich_text": [{ "type": "text", "text": { "content": "hi" }, "plain_text": "hi" }], "color": "default" }),
        );

        let Block::Paragraph(text) = &block else {
            panic!("expected paragraph, got {block:?}");
        };
        assert_eq!(text.rich_text.len(), 1);
        assert_eq!(text.color.as_deref(), Some("default"));
        assert_eq!(block.kind(), "paragraph");
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let payload = json!({ "anything": [1, 2, 3] });
        let block = Block::from_payload("ai_block", payload.clone());

        assert_eq!(
            block,
            Block::Unsupported {
                kind: "ai_block".to_owned(),
                payload
            }
        );
        assert_eq!(block.kind(), "ai_block");
    }

    #[test]
    fn test_mismatched_payload_is_unsupported() {
        // equation requires an expression
        let block = Block::from_payload("equation", json!({ "latex": "x" }));
        assert!(matches!(block, Block::Unsupported { ref kind, .. } if kind == "equation"));
    }

    #[test]
    fn test_extra_keys_round_trip() {
        let payload = json!({
            "rich_text": [],
            "color": "blue",
            "is_toggleable": true
        });
        let block = Block::from_payload("heading_2", payload.clone());

        let Block::Heading2(text) = &block else {
            panic!("expected heading");
        };
        assert_eq!(text.extra["is_toggleable"], true);
        assert_eq!(block.to_payload().unwrap(), payload);
        assert_eq!(block.heading_level(), Some(2));
    }

    #[test]
    fn test_media_hosted_url() {
        let block = Block::from_payload(
            "image",
            json!({
                "type": "file",
                "file": { "url": "https://s3.example.com/a.png?sig=1", "expiry_time": "2025-01-01T00:00:00.000Z" },
                "caption": []
            }),
        );

        let Block::Image(media) = block else {
            panic!("expected image");
        };
        assert_eq!(media.source, SourceKind::File);
        assert_eq!(media.url(), Some("https://s3.example.com/a.png?sig=1"));
    }

    #[test]
    fn test_media_set_url_clears_expiry() {
        let mut media = MediaBlock::hosted("https://s3.example.com/a.png");
        media.file.as_mut().unwrap().expiry_time = Some("soon".to_owned());

        assert!(media.set_url("./images/a.png".to_owned()));
        assert_eq!(media.url(), Some("./images/a.png"));
        assert_eq!(media.file.unwrap().expiry_time, None);
    }

    #[test]
    fn test_media_external_url() {
        let mut media = MediaBlock::external("https://example.com/cat.jpg");
        assert_eq!(media.url(), Some("https://example.com/cat.jpg"));
        assert!(media.set_url("local.jpg".to_owned()));
        assert_eq!(media.external.unwrap().url, "local.jpg");
    }

    #[test]
    fn test_default_fields_are_not_reintroduced() {
        let block = Block::from_payload("to_do", json!({ "rich_text": [] }));
        assert_eq!(block.to_payload().unwrap(), json!({ "rich_text": [] }));

        let block = Block::from_payload("bookmark", json!({ "caption": [] }));
        assert_eq!(block.to_payload().unwrap(), json!({}));
    }

    #[test]
    fn test_list_item_detection() {
        assert!(Block::BulletedListItem(TextBlock::default()).is_list_item());
        assert!(Block::NumberedListItem(TextBlock::default()).is_list_item());
        assert!(!Block::Paragraph(TextBlock::default()).is_list_item());
    }
}
