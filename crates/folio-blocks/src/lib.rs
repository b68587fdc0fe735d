//! Block tree model for Folio.
//!
//! A document is an ordered sequence of [`Node`]s, each owning its children.
//! Nodes carry a typed [`Block`] payload with [`RichText`] runs for inline
//! content, and (de)serialize in the content API's JSON block shape so the
//! same types serve both the API client and the tree cache.
//!
//! Tree-wide operations:
//! - [`PropertyTrimmer`]: recursive removal of configured keys
//! - [`count_block_types`] / [`outline`]: summaries used by the CLI and the
//!   renderer's table of contents
//!
//! # Example
//!
//! ```
//! use folio_blocks::{Block, Node, RichText, TextBlock};
//!
//! let node = Node::new("b1", Block::Paragraph(TextBlock::new(vec![RichText::new("Hi")])));
//! let json = serde_json::to_string(&node).unwrap();
//! let back: Node = serde_json::from_str(&json).unwrap();
//! assert_eq!(back, node);
//! ```

mod block;
mod node;
mod rich_text;
mod stats;
mod trim;

pub use block::{
    Block, CalloutBlock, CodeBlock, EquationBlock, FileUrl, Icon, LinkBlock, MediaBlock, PlainBlock,
    SourceKind, TableBlock, TableRowBlock, TextBlock, TitleBlock, ToDoBlock,
};
pub use node::{
    CHILDREN_KEY, HAS_CHILDREN_KEY, ID_KEY, LAST_MODIFIED_KEY, Node, NodeError, TYPE_KEY,
    find_incomplete, walk, walk_mut,
};
pub use rich_text::{
    Annotations, DEFAULT_COLOR, InlineEquation, Link, LinkMention, Mention, RichText,
    RichTextKind, TextContent, plain_text,
};
pub use stats::{HeadingEntry, count_block_types, outline};
pub use trim::{DEFAULT_TRIM_KEYS, PropertyTrimmer};
