//! Error types for media retrieval.

use std::path::PathBuf;

/// Error while downloading a media file.
///
/// Media errors are recovered per node: the resolver logs them and leaves
/// the node pointing at its remote URL.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Request failed or the server answered with an error status.
    #[error("failed to download {url}: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Transport error or HTTP status details.
        message: String,
    },

    /// The destination could not be created or written.
    #[error("failed to write {}", path.display())]
    Filesystem {
        /// Directory or file being written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
