//! Persistent record of downloaded media, keyed by node id.

use folio_cache::{Cache, CacheBucket, CacheBucketExt};

/// Bucket holding media records.
const MEDIA_BUCKET: &str = "media";

/// Maps node ids to the local copy of their media.
///
/// Each record stores the node's last-modified token as the entry etag and
/// the local path as the value. Records are written one entry at a time with
/// atomic replacement, so an interrupted write never damages other records.
/// An unreadable entry behaves like a missing one.
pub struct MediaCache {
    bucket: Box<dyn CacheBucket>,
}

impl MediaCache {
    /// Open the media bucket of `cache`.
    pub fn new(cache: &dyn Cache) -> Self {
        Self {
            bucket: cache.bucket(MEDIA_BUCKET),
        }
    }

    /// Whether the record for `node_id` was made for `last_modified`.
    ///
    /// An empty token never matches.
    pub fn is_fresh(&self, node_id: &str, last_modified: &str) -> bool {
        !last_modified.is_empty() && self.bucket.get(node_id, last_modified).is_some()
    }

    /// Local path recorded for `node_id`, whatever its version.
    pub fn path_for(&self, node_id: &str) -> Option<String> {
        self.bucket.get_string(node_id, "")
    }

    /// Record the local copy of `node_id`'s media, replacing any previous
    /// record.
    pub fn record(&self, node_id: &str, last_modified: &str, local_path: &str) {
        tracing::debug!("recording media for {node_id} at {local_path}");
        self.bucket.set_string(node_id, last_modified, local_path);
    }
}
