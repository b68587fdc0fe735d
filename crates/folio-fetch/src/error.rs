//! Error types for tree retrieval and caching.

use std::fmt::Display;

/// Error while fetching a block tree.
///
/// Both variants abort the fetch in progress. Nothing is retried here;
/// callers decide whether to try again.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The block source could not be reached or refused the request.
    #[error("block source unavailable while listing children of {node_id}: {message}")]
    SourceUnavailable {
        /// Node whose children were requested.
        node_id: String,
        /// Transport or HTTP error details.
        message: String,
    },

    /// A page violated the pagination contract.
    #[error("malformed page for {node_id}: {reason}")]
    MalformedPage {
        /// Node whose children were requested.
        node_id: String,
        /// What was wrong with the page.
        reason: String,
    },
}

impl FetchError {
    pub(crate) fn unavailable(node_id: &str, message: impl Display) -> Self {
        Self::SourceUnavailable {
            node_id: node_id.to_owned(),
            message: message.to_string(),
        }
    }

    pub(crate) fn malformed(node_id: &str, reason: impl Display) -> Self {
        Self::MalformedPage {
            node_id: node_id.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Error while persisting a tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeCacheError {
    /// A node announced children that were never fetched.
    #[error("refusing to cache tree {root_id}: node {node_id} has unfetched children")]
    Incomplete {
        /// Root the tree was fetched for.
        root_id: String,
        /// First incomplete node in pre-order.
        node_id: String,
    },

    /// The tree could not be serialized.
    #[error("failed to serialize tree {root_id}")]
    Serialize {
        /// Root the tree was fetched for.
        root_id: String,
        #[source]
        source: serde_json::Error,
    },
}
