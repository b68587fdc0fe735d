//! Persistent cache of materialized trees, keyed by root id.

use folio_blocks::{Node, find_incomplete};
use folio_cache::{Cache, CacheBucket, CacheBucketExt};

use crate::error::TreeCacheError;

/// Bucket holding serialized trees.
const TREE_BUCKET: &str = "trees";

/// Format tag stored as the etag of every entry.
///
/// Entries written with a different tag are treated as misses.
const TREE_FORMAT: &str = "tree-v2";

/// Previously fetched trees, keyed by root id.
///
/// Entries are never invalidated here. Whether a hit is still current is
/// the caller's decision (the CLI exposes it as `--refresh`).
pub struct TreeCache {
    bucket: Box<dyn CacheBucket>,
}

impl TreeCache {
    /// Open the tree bucket of `cache`.
    pub fn new(cache: &dyn Cache) -> Self {
        Self {
            bucket: cache.bucket(TREE_BUCKET),
        }
    }

    /// Load the tree stored for `root_id`.
    ///
    /// An entry that cannot be decoded is logged, removed, and reported as a
    /// miss.
    pub fn load(&self, root_id: &str) -> Option<Vec<Node>> {
        match self.bucket.get_json::<Vec<Node>>(root_id, TREE_FORMAT)? {
            Ok(tree) => {
                tracing::debug!("tree cache hit for {root_id}");
                Some(tree)
            }
            Err(e) => {
                tracing::warn!("discarding corrupt tree cache entry for {root_id}: {e}");
                self.bucket.remove(root_id);
                None
            }
        }
    }

    /// Store `tree` for `root_id`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`TreeCacheError::Incomplete`] without writing anything if a
    /// node announced children that were never fetched.
    pub fn store(&self, root_id: &str, tree: &[Node]) -> Result<(), TreeCacheError> {
        ensure_complete(root_id, tree)?;

        self.bucket
            .set_json(root_id, TREE_FORMAT, tree)
            .map_err(|source| TreeCacheError::Serialize {
                root_id: root_id.to_owned(),
                source,
            })?;
        tracing::debug!("stored tree {root_id} ({} top-level blocks)", tree.len());
        Ok(())
    }
}

/// Check that every node announcing children holds them.
///
/// Only meaningful while `has_children` is still present, so callers that
/// trim a tree check it first.
///
/// # Errors
///
/// Returns [`TreeCacheError::Incomplete`] naming the first node whose
/// children were never fetched.
pub fn ensure_complete(root_id: &str, tree: &[Node]) -> Result<(), TreeCacheError> {
    match find_incomplete(tree) {
        Some(node_id) => Err(TreeCacheError::Incomplete {
            root_id: root_id.to_owned(),
            node_id: node_id.to_owned(),
        }),
        None => Ok(()),
    }
}
