//! Mock block source for testing.
//!
//! Provides [`MockSource`] for exercising tree retrieval without network access.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use folio_blocks::Node;

use crate::error::FetchError;
use crate::source::{BlockPage, BlockSource};

/// Key of a registered page: node id and the cursor it is served for.
type PageKey = (String, Option<String>);

/// In-memory [`BlockSource`] for tests.
///
/// Pages are registered per `(node_id, cursor)` with the builder methods.
/// Every request is recorded so tests can assert on request order and count.
/// Requests for unregistered pages fail with
/// [`FetchError::SourceUnavailable`].
///
/// # Example
///
/// ```ignore
/// use folio_fetch::{MockSource, TreeFetcher};
///
/// let source = MockSource::new()
///     .with_pages("root", vec![vec![a, b], vec![c]]);
/// let tree = TreeFetcher::new(&source).fetch_tree("root").unwrap();
/// assert_eq!(source.request_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    pages: RwLock<HashMap<PageKey, BlockPage>>,
    failures: RwLock<HashSet<String>>,
    requests: Mutex<Vec<PageKey>>,
}

impl MockSource {
    /// Create a mock source with no pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw page served for `node_id` at `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, node_id: &str, cursor: Option<&str>, page: BlockPage) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert((node_id.to_owned(), cursor.map(str::to_owned)), page);
        self
    }

    /// Register all children of `node_id` as a single page.
    #[must_use]
    pub fn with_children(self, node_id: &str, children: Vec<Node>) -> Self {
        self.with_page(node_id, None, BlockPage::last(children))
    }

    /// Register children of `node_id` split into pages.
    ///
    /// Cursors are generated as `{node_id}-page-{n}`.
    #[must_use]
    pub fn with_pages(self, node_id: &str, pages: Vec<Vec<Node>>) -> Self {
        let count = pages.len();
        let mut source = self;
        let mut cursor: Option<String> = None;
        for (index, children) in pages.into_iter().enumerate() {
            let page = if index + 1 < count {
                BlockPage::more(children, format!("{node_id}-page-{}", index + 1))
            } else {
                BlockPage::last(children)
            };
            let next = page.next_cursor.clone();
            source = source.with_page(node_id, cursor.as_deref(), page);
            cursor = next;
        }
        source
    }

    /// Make every request for `node_id` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, node_id: &str) -> Self {
        self.failures.write().unwrap().insert(node_id.to_owned());
        self
    }

    /// Requests served so far, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn requests(&self) -> Vec<PageKey> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

impl BlockSource for MockSource {
    fn list_children(&self, node_id: &str, cursor: Option<&str>) -> Result<BlockPage, FetchError> {
        let key = (node_id.to_owned(), cursor.map(str::to_owned));
        self.requests.lock().unwrap().push(key.clone());

        if self.failures.read().unwrap().contains(node_id) {
            return Err(FetchError::unavailable(node_id, "connection refused"));
        }

        self.pages
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| {
                FetchError::unavailable(node_id, format!("no page for cursor {cursor:?}"))
            })
    }
}
