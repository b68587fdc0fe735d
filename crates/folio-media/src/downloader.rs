//! Media downloads to local files.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use percent_encoding::percent_decode_str;
use ureq::Agent;

use crate::error::MediaError;

/// Extension appended to derived names that have none.
pub const DEFAULT_EXTENSION: &str = "png";

/// Retrieves a remote file into a local directory.
pub trait MediaDownloader: Send + Sync {
    /// Download `url` into `dest_dir` and return the written path.
    ///
    /// When `filename` is `None` the name is derived from the URL with
    /// [`derive_filename`]. On failure no partial file is left behind.
    fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf, MediaError>;
}

/// Filename for `url`: its last path segment, or a random name when the
/// path ends in `/`. A default extension is added when the name has none.
pub fn derive_filename(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| {
            rest.split_once('/').map_or("", |(_, path)| path)
        });
    let segment = path.rsplit('/').next().unwrap_or_default();

    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let name: String = decoded
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let name = if name.is_empty() || name.chars().all(|c| c == '.') {
        uuid::Uuid::new_v4().simple().to_string()
    } else {
        name
    };

    if Path::new(&name).extension().is_some() {
        name
    } else {
        format!("{name}.{DEFAULT_EXTENSION}")
    }
}

/// [`MediaDownloader`] over HTTP.
pub struct HttpDownloader {
    agent: Agent,
}

impl HttpDownloader {
    /// Create a downloader whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl MediaDownloader for HttpDownloader {
    fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf, MediaError> {
        fs::create_dir_all(dest_dir).map_err(|source| MediaError::Filesystem {
            path: dest_dir.to_path_buf(),
            source,
        })?;
        let path = dest_dir.join(filename.map_or_else(|| derive_filename(url), str::to_owned));

        tracing::info!("Downloading {url} to {}", path.display());

        let transport = |message: String| MediaError::Transport {
            url: url.to_owned(),
            message,
        };

        let response = self.agent.get(url).call().map_err(|e| transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(transport(format!("HTTP {}", status.as_u16())));
        }

        let mut reader = response.into_body().into_reader();
        write_stream(url, &mut reader, &path)?;
        Ok(path)
    }
}

/// Copy `reader` into a new file at `path`.
///
/// Read failures are reported as transport errors and write failures as
/// filesystem errors. Whatever was written is removed on failure.
pub(crate) fn write_stream(
    url: &str,
    reader: &mut impl Read,
    path: &Path,
) -> Result<(), MediaError> {
    let result = copy_to_file(url, reader, path);
    if result.is_err() {
        remove_partial(path);
    }
    result
}

fn copy_to_file(url: &str, reader: &mut impl Read, path: &Path) -> Result<(), MediaError> {
    let filesystem = |source: io::Error| MediaError::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(filesystem)?;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(MediaError::Transport {
                    url: url.to_owned(),
                    message: e.to_string(),
                });
            }
        };
        file.write_all(&buf[..n]).map_err(filesystem)?;
    }
    file.sync_all().map_err(filesystem)
}

fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!("removed partial download {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("failed to remove partial download {}: {e}", path.display()),
    }
}
