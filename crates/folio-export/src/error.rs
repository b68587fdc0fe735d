//! Export error types.

use std::path::PathBuf;

use folio_fetch::{FetchError, TreeCacheError};

/// Error returned by the export pipeline.
///
/// Media failures never surface here: they are reported per node in
/// [`ExportReport`](crate::ExportReport) and the document still renders.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    TreeCache(#[from] TreeCacheError),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
