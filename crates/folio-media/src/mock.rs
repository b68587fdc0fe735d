//! Mock downloader for testing.
//!
//! Provides [`RecordingDownloader`] for exercising media resolution without
//! network access.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::downloader::{MediaDownloader, derive_filename};
use crate::error::MediaError;

/// [`MediaDownloader`] that writes placeholder bytes and records every call.
///
/// URLs registered with [`with_failure`](Self::with_failure) fail with
/// [`MediaError::Transport`].
#[derive(Debug, Default)]
pub struct RecordingDownloader {
    failures: RwLock<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingDownloader {
    /// Create a downloader that succeeds for every URL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make downloads of `url` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, url: &str) -> Self {
        self.failures.write().unwrap().insert(url.to_owned());
        self
    }

    /// URLs requested so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of download calls so far.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

impl MediaDownloader for RecordingDownloader {
    fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf, MediaError> {
        self.calls.lock().unwrap().push(url.to_owned());

        if self.failures.read().unwrap().contains(url) {
            return Err(MediaError::Transport {
                url: url.to_owned(),
                message: "HTTP 403".to_owned(),
            });
        }

        let filesystem = |source| MediaError::Filesystem {
            path: dest_dir.to_path_buf(),
            source,
        };
        fs::create_dir_all(dest_dir).map_err(filesystem)?;
        let path = dest_dir.join(filename.map_or_else(|| derive_filename(url), str::to_owned));
        fs::write(&path, url.as_bytes()).map_err(filesystem)?;
        Ok(path)
    }
}
