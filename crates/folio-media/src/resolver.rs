//! Rewrites remote media references in a tree to local copies.

use std::path::{self, Path};
use std::sync::LazyLock;

use folio_blocks::{Block, MediaBlock, Node, walk_mut};
use regex::Regex;

use crate::cache::MediaCache;
use crate::downloader::{DEFAULT_EXTENSION, MediaDownloader, derive_filename};
use crate::key::MediaKey;

/// File attachments whose URL path ends in one of these extensions are
/// treated as images.
static IMAGE_FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpeg|jpg|gif|png|webp)($|\?)").expect("invalid image file regex")
});

/// Outcome of one [`MediaResolver::resolve`] pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Nodes served from the media cache.
    pub cached: usize,
    /// Nodes whose media was downloaded.
    pub downloaded: usize,
    /// Nodes left pointing at their remote URL because the download failed.
    pub failed: Vec<String>,
}

impl ResolveReport {
    /// Number of nodes rewritten to a local reference.
    pub fn resolved(&self) -> usize {
        self.cached + self.downloaded
    }
}

/// Downloads media referenced by a tree and points the tree at the copies.
///
/// Image blocks are always candidates. File blocks are candidates when their
/// URL names an image file. A fresh media cache record whose file is still
/// on disk short-circuits the download. Failures stay local to their node.
///
/// Rewritten references are absolute paths, so a tree stays valid wherever
/// it is rendered. [`relative_links`](crate::relative_links) turns them into
/// document-relative links.
pub struct MediaResolver<'a> {
    cache: &'a MediaCache,
    downloader: &'a dyn MediaDownloader,
}

impl<'a> MediaResolver<'a> {
    pub fn new(cache: &'a MediaCache, downloader: &'a dyn MediaDownloader) -> Self {
        Self { cache, downloader }
    }

    /// Resolve every media reference in `tree`, downloading into `output_dir`.
    pub fn resolve(&self, tree: &mut [Node], output_dir: &Path) -> ResolveReport {
        let mut report = ResolveReport::default();
        let output_dir = path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());

        walk_mut(tree, &mut |node| {
            let id = node.id.clone();
            let last_modified = node.last_modified.clone().unwrap_or_default();
            let Some((prefix, media)) = media_target(&mut node.block) else {
                return;
            };
            let Some(url) = media.url().filter(|url| is_remote(url)).map(str::to_owned) else {
                return;
            };

            if let Some(local) = self.cached_path(&id, &last_modified) {
                tracing::debug!("media for {id} is fresh in cache");
                media.set_url(local);
                report.cached += 1;
                return;
            }

            let extension = extension_of(&url);
            let filename = MediaKey {
                node_id: &id,
                last_modified: &last_modified,
            }
            .filename(prefix, &extension);

            match self.downloader.download(&url, &output_dir, Some(&filename)) {
                Ok(path) => {
                    let local = path.to_string_lossy().into_owned();
                    if last_modified.is_empty() {
                        tracing::warn!("{id} has no last_edited_time, media will not be cached");
                    } else {
                        self.cache.record(&id, &last_modified, &local);
                    }
                    media.set_url(local);
                    report.downloaded += 1;
                }
                Err(e) => {
                    tracing::warn!("leaving media of {id} unresolved: {e}");
                    report.failed.push(id);
                }
            }
        });

        tracing::info!(
            "Resolved media: {} cached, {} downloaded, {} failed",
            report.cached,
            report.downloaded,
            report.failed.len()
        );
        report
    }

    fn cached_path(&self, node_id: &str, last_modified: &str) -> Option<String> {
        if !self.cache.is_fresh(node_id, last_modified) {
            return None;
        }
        let path = self.cache.path_for(node_id)?;
        if Path::new(&path).exists() {
            Some(path)
        } else {
            tracing::debug!("cached media of {node_id} is gone from {path}");
            None
        }
    }
}

/// Media payload to resolve and the filename prefix for it.
fn media_target(block: &mut Block) -> Option<(&'static str, &mut MediaBlock)> {
    match block {
        Block::Image(media) => Some(("image", media)),
        Block::File(media) if media.url().is_some_and(is_image_file) => Some(("file", media)),
        _ => None,
    }
}

fn is_image_file(url: &str) -> bool {
    IMAGE_FILE_PATTERN.is_match(url)
}

pub(crate) fn is_remote(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Lowercase extension of the file named by `url`.
fn extension_of(url: &str) -> String {
    let name = derive_filename(url);
    Path::new(&name)
        .extension()
        .map_or_else(
            || DEFAULT_EXTENSION.to_owned(),
            |ext| ext.to_string_lossy().to_lowercase(),
        )
}
