//! The content tree node.
//!
//! A [`Node`] is serialized in the content API's block shape:
//!
//! ```json
//! {
//!   "id": "...",
//!   "type": "paragraph",
//!   "last_edited_time": "2025-01-01T00:00:00.000Z",
//!   "has_children": false,
//!   "paragraph": { "rich_text": [...] },
//!   "children": [...]
//! }
//! ```
//!
//! The payload lives under the key named by `type`. Keys the model does not
//! name (`object`, `parent`, `created_time`, ...) are kept in
//! [`Node::attributes`].

use serde::de::Error as _;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::block::Block;

pub const ID_KEY: &str = "id";
pub const TYPE_KEY: &str = "type";
pub const LAST_MODIFIED_KEY: &str = "last_edited_time";
pub const HAS_CHILDREN_KEY: &str = "has_children";
pub const CHILDREN_KEY: &str = "children";

/// Error converting raw JSON into a [`Node`].
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Value is not a JSON object.
    #[error("block is not an object")]
    NotAnObject,
    /// A required key is missing.
    #[error("block is missing `{0}`")]
    MissingField(&'static str),
    /// A key holds a value of the wrong type.
    #[error("block field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// A single block in the content tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Stable block id.
    pub id: String,
    /// Version token, updated by the source whenever the block changes.
    pub last_modified: Option<String>,
    /// Source hint that the block has children.
    pub has_children: Option<bool>,
    /// Fetched children. `None` when never fetched, empty when fetched and
    /// there were none.
    pub children: Option<Vec<Node>>,
    pub block: Block,
    /// Remaining top-level keys, kept verbatim.
    pub attributes: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, block: Block) -> Self {
        Self {
            id: id.into(),
            last_modified: None,
            has_children: Some(false),
            children: None,
            block,
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }

    /// Set the source's `has_children` hint without attaching children.
    #[must_use]
    pub fn with_has_children(mut self, has_children: bool) -> Self {
        self.has_children = Some(has_children);
        self
    }

    /// Attach fetched children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.has_children = Some(true);
        self.children = Some(children);
        self
    }

    /// Source type name of the block.
    pub fn kind(&self) -> &str {
        self.block.kind()
    }

    /// Whether the source announced children for this node.
    pub fn expects_children(&self) -> bool {
        self.has_children == Some(true)
    }

    /// Fetched children, empty if none were fetched.
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Parse a node (and its nested `children`) from raw JSON.
    pub fn from_value(value: Value) -> Result<Self, NodeError> {
        let Value::Object(map) = value else {
            return Err(NodeError::NotAnObject);
        };
        Self::from_map(map)
    }

    fn from_map(mut map: Map<String, Value>) -> Result<Self, NodeError> {
        let id = take_string(&mut map, ID_KEY)?.ok_or(NodeError::MissingField(ID_KEY))?;
        let kind = take_string(&mut map, TYPE_KEY)?.ok_or(NodeError::MissingField(TYPE_KEY))?;
        let last_modified = take_string(&mut map, LAST_MODIFIED_KEY)?;

        let has_children = match map.remove(HAS_CHILDREN_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(b),
            Some(_) => {
                return Err(NodeError::InvalidField {
                    field: HAS_CHILDREN_KEY,
                    expected: "a boolean",
                });
            }
        };

        let children = match map.remove(CHILDREN_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .map(Self::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(_) => {
                return Err(NodeError::InvalidField {
                    field: CHILDREN_KEY,
                    expected: "an array",
                });
            }
        };

        let payload = map
            .remove(&kind)
            .unwrap_or_else(|| Value::Object(Map::new()));
        let block = Block::from_payload(&kind, payload);

        Ok(Self {
            id,
            last_modified,
            has_children,
            children,
            block,
            attributes: map,
        })
    }
}

fn take_string(
    map: &mut Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, NodeError> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(NodeError::InvalidField {
            field: key,
            expected: "a string",
        }),
    }
}

fn is_reserved(key: &str, kind: &str) -> bool {
    key == kind
        || matches!(
            key,
            ID_KEY | TYPE_KEY | LAST_MODIFIED_KEY | HAS_CHILDREN_KEY | CHILDREN_KEY
        )
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        let payload = self.block.to_payload().map_err(S::Error::custom)?;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ID_KEY, &self.id)?;
        map.serialize_entry(TYPE_KEY, kind)?;
        if let Some(last_modified) = &self.last_modified {
            map.serialize_entry(LAST_MODIFIED_KEY, last_modified)?;
        }
        if let Some(has_children) = self.has_children {
            map.serialize_entry(HAS_CHILDREN_KEY, &has_children)?;
        }
        map.serialize_entry(kind, &payload)?;
        if let Some(children) = &self.children {
            map.serialize_entry(CHILDREN_KEY, children)?;
        }
        for (key, value) in &self.attributes {
            if !is_reserved(key, kind) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_map(map).map_err(D::Error::custom)
    }
}

/// Visit every node in pre-order (parent before children, siblings in order).
pub fn walk<'a>(nodes: &'a [Node], f: &mut impl FnMut(&'a Node)) {
    for node in nodes {
        f(node);
        walk(node.children(), f);
    }
}

/// Mutable pre-order visit.
pub fn walk_mut(nodes: &mut [Node], f: &mut impl FnMut(&mut Node)) {
    for node in nodes {
        f(node);
        if let Some(children) = node.children.as_mut() {
            walk_mut(children, f);
        }
    }
}

/// Id of the first node that announced children but has none attached.
///
/// Such a tree is the result of an interrupted fetch and must not be
/// persisted.
pub fn find_incomplete(nodes: &[Node]) -> Option<&str> {
    let mut found = None;
    walk(nodes, &mut |node| {
        if found.is_none() && node.expects_children() && node.children.is_none() {
            found = Some(node.id.as_str());
        }
    });
    found
}
