//! Recursive, paginated tree retrieval.

use std::collections::HashSet;

use folio_blocks::Node;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::source::BlockSource;

/// Builds a complete in-memory tree from a [`BlockSource`].
///
/// Retrieval is depth-first: every child that announces children has its
/// whole subtree fetched before the next page of its parent is requested.
/// With [`parallel`](Self::parallel) enabled, the subtrees of siblings on the
/// same page are fetched concurrently on the rayon pool. Siblings are filled
/// in place, so source order is kept either way.
pub struct TreeFetcher<'a> {
    source: &'a dyn BlockSource,
    parallel: bool,
}

impl<'a> TreeFetcher<'a> {
    /// Create a sequential fetcher over `source`.
    pub fn new(source: &'a dyn BlockSource) -> Self {
        Self {
            source,
            parallel: false,
        }
    }

    /// Fetch sibling subtrees concurrently.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fetch the full tree below `root_id`.
    ///
    /// Returns the root's children in source order, each with its subtree
    /// attached. A node that announced children but has none gets an empty
    /// child list, never an absent one.
    ///
    /// # Errors
    ///
    /// Returns the first [`FetchError`] raised by the source or by a page that
    /// breaks the pagination contract. No partial tree is returned.
    pub fn fetch_tree(&self, root_id: &str) -> Result<Vec<Node>, FetchError> {
        info!(root_id, parallel = self.parallel, "Fetching block tree");
        let tree = self.fetch_children(root_id)?;
        debug!(root_id, top_level = tree.len(), "Block tree fetched");
        Ok(tree)
    }

    fn fetch_children(&self, node_id: &str) -> Result<Vec<Node>, FetchError> {
        let mut children = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();

        loop {
            let page = self.source.list_children(node_id, cursor.as_deref())?;
            debug!(
                node_id,
                cursor = cursor.as_deref().unwrap_or("start"),
                count = page.children.len(),
                has_more = page.has_more,
                "Fetched page"
            );

            let mut batch = page.children;
            self.fill_subtrees(&mut batch)?;
            children.append(&mut batch);

            if !page.has_more {
                return Ok(children);
            }

            let next = page.next_cursor.ok_or_else(|| {
                FetchError::malformed(node_id, "has_more is set without next_cursor")
            })?;
            if !seen_cursors.insert(next.clone()) {
                return Err(FetchError::malformed(
                    node_id,
                    format!("cursor {next} was already served"),
                ));
            }
            cursor = Some(next);
        }
    }

    fn fill_subtrees(&self, batch: &mut [Node]) -> Result<(), FetchError> {
        let fill = |node: &mut Node| -> Result<(), FetchError> {
            node.children = Some(self.fetch_children(&node.id)?);
            Ok(())
        };

        if self.parallel {
            batch
                .par_iter_mut()
                .filter(|node| node.expects_children())
                .try_for_each(fill)
        } else {
            batch
                .iter_mut()
                .filter(|node| node.expects_children())
                .try_for_each(fill)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;
    use crate::source::BlockPage;
    use folio_blocks::{Block, TextBlock};
    use pretty_assertions::assert_eq;

    fn leaf(id: &str) -> Node {
        Node::new(id, Block::Divider(Default::default()))
    }

    fn parent(id: &str) -> Node {
        Node::new(id, Block::Toggle(TextBlock::default())).with_has_children(true)
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_pagination_keeps_page_order() {
        let source = MockSource::new().with_pages(
            "root",
            vec![
                vec![leaf("a"), leaf("b")],
                vec![leaf("c"), leaf("d")],
                vec![leaf("e")],
            ],
        );

        let tree = TreeFetcher::new(&source).fetch_tree("root").unwrap();

        assert_eq!(ids(&tree), ["a", "b", "c", "d", "e"]);
        assert_eq!(source.request_count(), 3);
    }

    #[test]
    fn test_recursive_fetch_attaches_grandchildren() {
        let source = MockSource::new()
            .with_children("A", vec![parent("B")])
            .with_children("B", vec![leaf("C")]);

        let tree = TreeFetcher::new(&source).fetch_tree("A").unwrap();

        assert_eq!(ids(&tree), ["B"]);
        assert_eq!(ids(tree[0].children()), ["C"]);
        assert_eq!(tree[0].children()[0].children, None);
    }

    #[test]
    fn test_empty_child_fetch_is_recorded_as_empty() {
        let source = MockSource::new()
            .with_children("root", vec![parent("t")])
            .with_children("t", vec![]);

        let tree = TreeFetcher::new(&source).fetch_tree("root").unwrap();
        assert_eq!(tree[0].children, Some(vec![]));
    }

    #[test]
    fn test_leaves_are_not_requested() {
        let source = MockSource::new().with_children("root", vec![leaf("a"), leaf("b")]);

        TreeFetcher::new(&source).fetch_tree("root").unwrap();
        assert_eq!(source.requests(), [("root".to_owned(), None)]);
    }

    #[test]
    fn test_subtree_resolved_before_next_page() {
        let source = MockSource::new()
            .with_pages("root", vec![vec![parent("x")], vec![leaf("y")]])
            .with_children("x", vec![leaf("x1")]);

        TreeFetcher::new(&source).fetch_tree("root").unwrap();

        let order: Vec<_> = source
            .requests()
            .into_iter()
            .map(|(id, cursor)| format!("{id}@{}", cursor.unwrap_or_default()))
            .collect();
        assert_eq!(order, ["root@", "x@", "root@root-page-1"]);
    }

    #[test]
    fn test_has_more_without_cursor_is_malformed() {
        let page = BlockPage {
            children: vec![leaf("a")],
            next_cursor: None,
            has_more: true,
        };
        let source = MockSource::new().with_page("root", None, page);

        let err = TreeFetcher::new(&source).fetch_tree("root").unwrap_err();
        assert!(matches!(err, FetchError::MalformedPage { ref node_id, .. } if node_id == "root"));
    }

    #[test]
    fn test_repeated_cursor_is_malformed() {
        let source = MockSource::new()
            .with_page("root", None, BlockPage::more(vec![leaf("a")], "c1"))
            .with_page("root", Some("c1"), BlockPage::more(vec![leaf("b")], "c1"));

        let err = TreeFetcher::new(&source).fetch_tree("root").unwrap_err();
        assert!(err.to_string().contains("already served"));
    }

    #[test]
    fn test_nested_failure_propagates() {
        let source = MockSource::new()
            .with_children("root", vec![leaf("a"), parent("b")])
            .with_failure("b");

        let err = TreeFetcher::new(&source).fetch_tree("root").unwrap_err();
        assert!(matches!(err, FetchError::SourceUnavailable { ref node_id, .. } if node_id == "b"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let source = MockSource::new()
            .with_pages(
                "root",
                vec![vec![parent("p1"), leaf("l1"), parent("p2")], vec![parent("p3")]],
            )
            .with_children("p1", vec![leaf("p1a"), parent("p1b")])
            .with_children("p1b", vec![leaf("p1b1")])
            .with_pages("p2", vec![vec![leaf("p2a")], vec![leaf("p2b")]])
            .with_children("p3", vec![]);

        let sequential = TreeFetcher::new(&source).fetch_tree("root").unwrap();
        let parallel = TreeFetcher::new(&source)
            .parallel(true)
            .fetch_tree("root")
            .unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(ids(&parallel), ["p1", "l1", "p2", "p3"]);
        assert_eq!(ids(parallel[2].children()), ["p2a", "p2b"]);
    }

    #[test]
    fn test_parallel_failure_propagates() {
        let source = MockSource::new()
            .with_children("root", vec![parent("ok"), parent("bad")])
            .with_children("ok", vec![])
            .with_failure("bad");

        let result = TreeFetcher::new(&source).parallel(true).fetch_tree("root");
        assert!(result.is_err());
    }
}
