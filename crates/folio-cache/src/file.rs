//! File-based cache implementation.
//!
//! [`FileCache`] stores cache entries as files on disk, organized into buckets
//! (subdirectories). Each entry is a single file with a binary header followed
//! by the data:
//!
//! ```text
//! [etag_len: u32 LE][etag bytes][data bytes]
//! ```
//!
//! On read, only the header is read first to validate the etag. The full data
//! is read only on cache hit, avoiding unnecessary I/O on mismatch.
//!
//! Entries are written to a temporary file in the bucket directory and then
//! renamed over the target, so a crash mid-write leaves the previous entry
//! intact.
//!
//! [`FileCache::open`] validates a `VERSION` file in the cache root. If the
//! version mismatches or is missing, the entire cache directory is wiped and
//! recreated.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Cache, CacheBucket};

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION            # contains the cache version string
/// +-- trees/             # bucket "trees"
/// |   +-- {root-id}      # cache entry
/// +-- media/             # bucket "media"
///     +-- ...
/// ```
///
/// Construction performs no I/O; call [`open`](Self::open) before use.
pub struct FileCache {
    root: PathBuf,
    version: String,
}

impl FileCache {
    /// Describe a file-based cache at `root` for the given format `version`.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        Self {
            root,
            version: version.to_owned(),
        }
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the cache directory and validate its version.
    ///
    /// If the `VERSION` file inside the root does not match, the entire
    /// cache directory is removed and recreated with the new version.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory or the `VERSION` file cannot
    /// be created.
    pub fn open(&self) -> io::Result<()> {
        let version_file = self.root.join("VERSION");

        match fs::read_to_string(&version_file) {
            Ok(stored) if stored == self.version => {
                tracing::debug!("cache version matches: {}", self.version);
                return Ok(());
            }
            Ok(stored) => {
                tracing::info!(
                    "cache version mismatch (stored={stored}, current={}), wiping cache",
                    self.version
                );
            }
            Err(_) => {
                tracing::info!("no cache VERSION file found, initializing cache");
            }
        }

        if self.root.exists()
            && let Err(e) = fs::remove_dir_all(&self.root)
        {
            tracing::warn!("failed to remove cache directory: {e}");
        }
        fs::create_dir_all(&self.root)?;
        fs::write(&version_file, &self.version)
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

/// A single bucket backed by a directory on disk.
struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    /// Path for `key`, or `None` if the key would escape the bucket.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let is_safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_safe {
            tracing::warn!("rejecting cache key {key:?}");
            return None;
        }
        Some(self.dir.join(relative))
    }

    /// Open an entry and read its stored etag, leaving the reader at the data.
    fn read_header(&self, key: &str) -> Option<(File, Vec<u8>)> {
        let path = self.entry_path(key)?;
        let mut file = File::open(&path).ok()?;

        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf).ok()?;
        let etag_len = u32::from_le_bytes(len_buf) as usize;

        // A header longer than the file is a truncated or foreign file
        let file_len = file.metadata().ok()?.len();
        if etag_len as u64 > file_len.saturating_sub(4) {
            return None;
        }

        let mut stored_etag = vec![0u8; etag_len];
        file.read_exact(&mut stored_etag).ok()?;
        Some((file, stored_etag))
    }

    fn write_entry(path: &Path, etag: &str, value: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;

        let etag_bytes = etag.as_bytes();
        let etag_len = u32::try_from(etag_bytes.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "etag too long"))?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&etag_len.to_le_bytes())?;
        tmp.write_all(etag_bytes)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let (mut file, stored_etag) = self.read_header(key)?;

        // Validate etag (skip if caller passes empty etag)
        if !etag.is_empty() && stored_etag != etag.as_bytes() {
            return None;
        }

        let mut data = Vec::new();
        file.read_to_end(&mut data).ok()?;
        Some(data)
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        if let Err(e) = Self::write_entry(&path, etag, value) {
            tracing::warn!("failed to write cache entry {}: {e}", path.display());
        }
    }

    fn remove(&self, key: &str) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to remove cache entry {}: {e}", path.display()),
        }
    }
}
