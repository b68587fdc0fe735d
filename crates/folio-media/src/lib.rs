//! Media handling for Folio.
//!
//! Media referenced by a fetched tree (image blocks, and file blocks that
//! point at images) is downloaded once per block version and the tree is
//! rewritten to reference the local copy.
//!
//! - [`MediaCache`]: which version of a block's media is on disk, and where
//! - [`MediaDownloader`] / [`HttpDownloader`]: fetch a URL into a directory
//! - [`MediaResolver`]: walk a tree and tie the two together
//! - [`relative_links`] / [`missing_media`]: view the resolved references
//!   from the rendered document
//!
//! # Example
//!
//! ```ignore
//! use folio_media::{HttpDownloader, MediaCache, MediaResolver, relative_links};
//!
//! let media = MediaCache::new(&cache);
//! let downloader = HttpDownloader::new(Duration::from_secs(30));
//! let report = MediaResolver::new(&media, &downloader)
//!     .resolve(&mut tree, &output_dir.join("images"));
//! relative_links(&mut tree, &output_dir);
//! ```

mod cache;
mod downloader;
mod error;
mod key;
mod links;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod resolver;

pub use cache::MediaCache;
pub use downloader::{DEFAULT_EXTENSION, HttpDownloader, MediaDownloader, derive_filename};
pub use error::MediaError;
pub use key::MediaKey;
pub use links::{missing_media, relative_links};
#[cfg(any(test, feature = "mock"))]
pub use mock::RecordingDownloader;
pub use resolver::{MediaResolver, ResolveReport};
