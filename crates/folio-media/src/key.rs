//! Content-addressed filenames for downloaded media.

use sha2::{Digest, Sha256};

/// Hex digits of the hash kept in filenames.
const NAME_HASH_LEN: usize = 16;

/// Identity of one version of a node's media.
///
/// A new last-modified token yields a new filename, so an updated image
/// never overwrites the file an older export still links to.
#[derive(Debug)]
pub struct MediaKey<'a> {
    /// Block id.
    pub node_id: &'a str,
    /// Last-modified token of the block.
    pub last_modified: &'a str,
}

impl MediaKey<'_> {
    /// SHA-256 of `"{node_id}:{last_modified}"` as lowercase hex.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.node_id.as_bytes());
        hasher.update(b":");
        hasher.update(self.last_modified.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Filename `{prefix}-{hash}.{extension}` for this media version.
    pub fn filename(&self, prefix: &str, extension: &str) -> String {
        let hash = self.compute_hash();
        format!("{prefix}-{}.{extension}", &hash[..NAME_HASH_LEN])
    }
}
