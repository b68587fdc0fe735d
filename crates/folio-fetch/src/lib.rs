//! Block tree retrieval for Folio.
//!
//! - [`BlockSource`]: paginated access to the children of a node, with
//!   [`NotionClient`] as the HTTP implementation
//! - [`TreeFetcher`]: depth-first recursive fetch of a complete tree
//! - [`TreeCache`]: persisted trees keyed by root id
//!
//! # Example
//!
//! ```ignore
//! use folio_fetch::{NotionClient, TreeCache, TreeFetcher};
//!
//! let client = NotionClient::new(&config.notion, token);
//! let tree = TreeFetcher::new(&client).fetch_tree(root_id)?;
//! TreeCache::new(&cache).store(root_id, &tree)?;
//! ```

mod client;
mod error;
mod fetcher;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod source;
mod tree_cache;

pub use client::NotionClient;
pub use error::{FetchError, TreeCacheError};
pub use fetcher::TreeFetcher;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;
pub use source::{BlockPage, BlockSource};
pub use tree_cache::{TreeCache, ensure_complete};
