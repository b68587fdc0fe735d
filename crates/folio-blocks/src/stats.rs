//! Whole-tree summaries: block type counts and the heading outline.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::node::{Node, walk};
use crate::rich_text::plain_text;

/// Count nodes per block type, at every depth.
pub fn count_block_types(nodes: &[Node]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    walk(nodes, &mut |node| {
        *counts.entry(node.kind().to_owned()).or_insert(0) += 1;
    });
    counts
}

/// Heading entry of a document outline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    /// Heading level (1-3).
    pub level: u8,
    /// Heading text without formatting.
    pub text: String,
    /// Block id, used as the anchor.
    pub id: String,
}

/// Collect headings in document order, including nested ones.
pub fn outline(nodes: &[Node]) -> Vec<HeadingEntry> {
    let mut entries = Vec::new();
    walk(nodes, &mut |node| {
        if let (Some(level), Some(text)) = (node.block.heading_level(), node.block.rich_text()) {
            entries.push(HeadingEntry {
                level,
                text: plain_text(text),
                id: node.id.clone(),
            });
        }
    });
    entries
}
