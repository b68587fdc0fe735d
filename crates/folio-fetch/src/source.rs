//! The block source abstraction and its page type.

use folio_blocks::Node;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;

/// One page of children returned by a [`BlockSource`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockPage {
    /// Children in source order.
    pub children: Vec<Node>,
    /// Cursor for the next page, present when `has_more` is set.
    pub next_cursor: Option<String>,
    /// Whether more pages follow.
    pub has_more: bool,
}

impl BlockPage {
    /// Final page holding `children`.
    #[must_use]
    pub fn last(children: Vec<Node>) -> Self {
        Self {
            children,
            next_cursor: None,
            has_more: false,
        }
    }

    /// Page holding `children`, continued at `next_cursor`.
    #[must_use]
    pub fn more(children: Vec<Node>, next_cursor: impl Into<String>) -> Self {
        Self {
            children,
            next_cursor: Some(next_cursor.into()),
            has_more: true,
        }
    }

    /// Parse a list-children response body.
    ///
    /// Expected shape: `{"results": [...], "has_more": bool, "next_cursor": string|null}`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MalformedPage`] if the body is not valid JSON,
    /// lacks `results` or `has_more`, or holds a block that cannot be parsed.
    pub fn from_json(node_id: &str, body: &str) -> Result<Self, FetchError> {
        #[derive(Deserialize)]
        struct RawPage {
            results: Vec<Value>,
            has_more: bool,
            #[serde(default)]
            next_cursor: Option<String>,
        }

        let raw: RawPage =
            serde_json::from_str(body).map_err(|e| FetchError::malformed(node_id, e))?;

        let children = raw
            .results
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Node::from_value(value)
                    .map_err(|e| FetchError::malformed(node_id, format!("result {index}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            children,
            next_cursor: raw.next_cursor,
            has_more: raw.has_more,
        })
    }
}

/// Paginated access to the children of a node.
///
/// Implementations own transport, authentication and timeouts. A `None`
/// cursor requests the first page.
pub trait BlockSource: Send + Sync {
    /// List one page of children of `node_id`.
    fn list_children(&self, node_id: &str, cursor: Option<&str>) -> Result<BlockPage, FetchError>;
}
