//! Recursive attribute removal.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::block::Block;
use crate::node::{HAS_CHILDREN_KEY, LAST_MODIFIED_KEY, Node};

/// Default keys removed before a tree is cached: bookkeeping the renderer
/// never reads.
pub const DEFAULT_TRIM_KEYS: &[&str] = &[
    "created_time",
    "last_edited_time",
    "created_by",
    "last_edited_by",
    "has_children",
    "archived",
    "in_trash",
    "parent",
    "object",
];

/// Deletes a configured set of keys from every node of a tree.
///
/// Deletion is shallow: a removed value is not visited. Every retained value
/// is traversed, however deeply nested, typed payload fields included. A
/// payload that no longer has the shape of its block type afterwards is kept
/// as [`Block::Unsupported`]. `id`, `type` and `children` make up the tree
/// and are never removed from a node.
#[derive(Clone, Debug, Default)]
pub struct PropertyTrimmer {
    keys: BTreeSet<String>,
}

impl PropertyTrimmer {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Trimmer for [`DEFAULT_TRIM_KEYS`].
    pub fn with_default_keys() -> Self {
        Self::new(DEFAULT_TRIM_KEYS.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Trim every node of `nodes` in place.
    pub fn trim(&self, nodes: &mut [Node]) {
        if self.keys.is_empty() {
            return;
        }
        for node in nodes {
            self.trim_node(node);
        }
    }

    fn trim_node(&self, node: &mut Node) {
        if self.keys.contains(LAST_MODIFIED_KEY) {
            node.last_modified = None;
        }
        if self.keys.contains(HAS_CHILDREN_KEY) {
            node.has_children = None;
        }
        if let Some(children) = node.children.as_mut() {
            self.trim(children);
        }

        self.trim_map(&mut node.attributes);
        self.trim_payload(node);
    }

    /// Trim the raw form of the payload and decode it again.
    fn trim_payload(&self, node: &mut Node) {
        let mut payload = match node.block.to_payload() {
            Ok(payload) => payload,
            Err(err) => {
                let kind = node.kind();
                tracing::warn!(id = %node.id, "payload of {kind} block not trimmed: {err}");
                return;
            }
        };
        if self.trim_value(&mut payload) {
            let kind = node.kind().to_owned();
            node.block = Block::from_payload(&kind, payload);
        }
    }

    /// Returns whether anything was removed.
    fn trim_map(&self, map: &mut Map<String, Value>) -> bool {
        let before = map.len();
        map.retain(|key, _| !self.keys.contains(key));
        let mut removed = map.len() != before;
        for value in map.values_mut() {
            removed |= self.trim_value(value);
        }
        removed
    }

    fn trim_value(&self, value: &mut Value) -> bool {
        match value {
            Value::Object(map) => self.trim_map(map),
            Value::Array(items) => items
                .iter_mut()
                .fold(false, |removed, item| self.trim_value(item) | removed),
            _ => false,
        }
    }
}
