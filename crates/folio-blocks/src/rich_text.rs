//! Inline rich text runs.
//!
//! A block's text payload is a sequence of [`RichText`] runs in display
//! order. Each run carries its own style [`Annotations`] and optionally a
//! hyperlink or a [`Mention`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::is_false;

/// Style annotations applied to a single run.
///
/// Only the annotations that are set are serialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub code: bool,
    /// Named color (`"default"`, `"red"`, `"blue_background"`, ...).
    #[serde(skip_serializing_if = "is_default_color")]
    pub color: String,
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: DEFAULT_COLOR.to_owned(),
        }
    }
}

impl Annotations {
    /// Whether the color is the source's neutral default.
    pub fn has_default_color(&self) -> bool {
        is_default_color(&self.color)
    }

    /// Whether no annotation is set.
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.strikethrough || self.underline || self.code)
            && self.has_default_color()
    }
}

fn is_default_color(color: &str) -> bool {
    color.is_empty() || color == DEFAULT_COLOR
}

/// Color name the source uses for "no color".
pub const DEFAULT_COLOR: &str = "default";

/// Kind of a rich text run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RichTextKind {
    #[default]
    Text,
    Mention,
    Equation,
    /// Any run type this crate does not model. Rendered from `plain_text`.
    #[serde(other)]
    Other,
}

/// A contiguous span of styled text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(rename = "type", default)]
    pub kind: RichTextKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plain_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Annotations::is_plain")]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention: Option<Mention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equation: Option<InlineEquation>,
}

impl RichText {
    /// Create an unstyled text run.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            kind: RichTextKind::Text,
            plain_text: content.clone(),
            href: None,
            annotations: Annotations::default(),
            text: Some(TextContent {
                content,
                link: None,
            }),
            mention: None,
            equation: None,
        }
    }

    /// Replace the run's annotations.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Attach a hyperlink target.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Displayed text of the run.
    ///
    /// Falls back to the text content when the source omitted `plain_text`.
    pub fn plain(&self) -> &str {
        if !self.plain_text.is_empty() {
            return &self.plain_text;
        }
        self.text.as_ref().map_or("", |t| t.content.as_str())
    }

    /// Effective link target: `href`, or the text content's own link.
    pub fn link(&self) -> Option<&str> {
        self.href.as_deref().or_else(|| {
            self.text
                .as_ref()
                .and_then(|t| t.link.as_ref())
                .map(|l| l.url.as_str())
        })
    }

    /// Link mention payload, if this run is one.
    pub fn link_mention(&self) -> Option<&LinkMention> {
        if self.kind != RichTextKind::Mention {
            return None;
        }
        self.mention.as_ref()?.link_mention.as_ref()
    }
}

/// Concatenate the plain text of a run sequence.
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(RichText::plain).collect()
}

/// Text content of a `text` run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Inline equation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineEquation {
    pub expression: String,
}

/// Mention payload of a `mention` run.
///
/// Only link mentions are modeled; page, user and date mentions keep their
/// data in `extra` and render from the run's plain text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_mention: Option<LinkMention>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rich reference to an external resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMention {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}
