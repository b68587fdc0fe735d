//! Fetch, resolve, trim, cache and render a document.

use std::fs;
use std::path::{Path, PathBuf};

use folio_blocks::{HeadingEntry, Node, PropertyTrimmer};
use folio_cache::Cache;
use folio_config::{Config, TrimConfig};
use folio_fetch::{BlockSource, TreeCache, TreeFetcher, ensure_complete};
use folio_media::{
    MediaCache, MediaDownloader, MediaResolver, ResolveReport, missing_media, relative_links,
};
use folio_renderer::BlockRenderer;

use crate::error::ExportError;
use crate::shell::PageShell;

/// File name of the written document.
pub const INDEX_FILE: &str = "index.html";

/// A tree ready for rendering.
#[derive(Debug)]
pub struct LoadedTree {
    /// Resolved media is referenced by absolute path.
    pub tree: Vec<Node>,
    /// Whether the tree came from the tree cache (no source requests made).
    pub from_cache: bool,
    /// Media resolution outcome. Empty for cache hits.
    pub media: ResolveReport,
}

/// Outcome of [`Exporter::export`].
#[derive(Debug)]
pub struct ExportReport {
    /// Path of the written document.
    pub path: PathBuf,
    pub from_cache: bool,
    pub media: ResolveReport,
    /// Heading outline of the document.
    pub toc: Vec<HeadingEntry>,
    /// Renderer warnings.
    pub warnings: Vec<String>,
}

/// Document export pipeline.
///
/// On a tree cache miss (or when refreshing) the tree is fetched from the
/// source, its media is resolved into the media directory, configured keys
/// are trimmed, and the result is cached. A cache hit skips all of that,
/// unless media files it references have been deleted since. The tree is
/// then rendered with media links relative to the output directory and
/// written there as `index.html`.
///
/// Completeness is checked and media resolved before trimming: both read
/// keys (`has_children`, `last_edited_time`) the default trim set removes.
pub struct Exporter<'a> {
    source: &'a dyn BlockSource,
    cache: &'a dyn Cache,
    downloader: &'a dyn MediaDownloader,
    output_dir: PathBuf,
    media_dir: PathBuf,
    trimmer: PropertyTrimmer,
    shell: PageShell,
    parallel: bool,
    refresh: bool,
}

impl<'a> Exporter<'a> {
    /// Create an exporter writing to `output_dir`.
    ///
    /// Media goes to `{output_dir}/images`, the default trim keys apply and
    /// the document is titled "Document".
    pub fn new(
        source: &'a dyn BlockSource,
        cache: &'a dyn Cache,
        downloader: &'a dyn MediaDownloader,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let output_dir = output_dir.into();
        Self {
            source,
            cache,
            downloader,
            media_dir: output_dir.join("images"),
            output_dir,
            trimmer: PropertyTrimmer::with_default_keys(),
            shell: PageShell::new("Document"),
            parallel: false,
            refresh: false,
        }
    }

    /// Create an exporter from loaded configuration.
    pub fn from_config(
        config: &Config,
        source: &'a dyn BlockSource,
        cache: &'a dyn Cache,
        downloader: &'a dyn MediaDownloader,
    ) -> Self {
        Self::new(source, cache, downloader, &config.output_resolved.dir)
            .media_dir(&config.media_resolved.dir)
            .trimmer(trimmer_for(&config.trim))
            .shell(PageShell::from_config(&config.output_resolved))
            .parallel(config.fetch.parallel)
    }

    #[must_use]
    pub fn media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = dir.into();
        self
    }

    #[must_use]
    pub fn trimmer(mut self, trimmer: PropertyTrimmer) -> Self {
        self.trimmer = trimmer;
        self
    }

    #[must_use]
    pub fn shell(mut self, shell: PageShell) -> Self {
        self.shell = shell;
        self
    }

    /// Fetch sibling subtrees in parallel.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Ignore cached trees and fetch from the source.
    #[must_use]
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Directory the document is written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Load the tree of `root_id` from the tree cache, or fetch and prepare
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Fetch`] if the source fails. Nothing is cached
    /// in that case.
    pub fn load_tree(&self, root_id: &str) -> Result<LoadedTree, ExportError> {
        let trees = TreeCache::new(self.cache);

        if !self.refresh
            && let Some(tree) = trees.load(root_id)
        {
            let missing = missing_media(&tree);
            if missing.is_empty() {
                tracing::info!("Using cached tree for {root_id}");
                return Ok(LoadedTree {
                    tree,
                    from_cache: true,
                    media: ResolveReport::default(),
                });
            }
            tracing::warn!(
                "Cached tree for {root_id} references {} missing media file(s), fetching again",
                missing.len()
            );
        }

        tracing::info!("Fetching tree {root_id}");
        let mut tree = TreeFetcher::new(self.source)
            .parallel(self.parallel)
            .fetch_tree(root_id)?;
        ensure_complete(root_id, &tree)?;

        let media_cache = MediaCache::new(self.cache);
        let media =
            MediaResolver::new(&media_cache, self.downloader).resolve(&mut tree, &self.media_dir);

        self.trimmer.trim(&mut tree);
        trees.store(root_id, &tree)?;

        Ok(LoadedTree {
            tree,
            from_cache: false,
            media,
        })
    }

    /// Export `root_id` to `{output_dir}/index.html`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be loaded or the document cannot
    /// be written. A failed fetch writes nothing.
    pub fn export(&self, root_id: &str) -> Result<ExportReport, ExportError> {
        let mut loaded = self.load_tree(root_id)?;
        relative_links(&mut loaded.tree, &self.output_dir);
        let result = BlockRenderer::new().render(&loaded.tree);
        for warning in &result.warnings {
            tracing::warn!("{warning}");
        }

        let document = self.shell.wrap(&result.html);
        let path = self.output_dir.join(INDEX_FILE);
        write_document(&path, &document)?;
        tracing::info!("Wrote {}", path.display());

        Ok(ExportReport {
            path,
            from_cache: loaded.from_cache,
            media: loaded.media,
            toc: result.toc,
            warnings: result.warnings,
        })
    }
}

/// Trimmer for the `[trim]` section: the default keys unless configured.
pub fn trimmer_for(config: &TrimConfig) -> PropertyTrimmer {
    match &config.keys {
        Some(keys) => PropertyTrimmer::new(keys.iter().map(String::as_str)),
        None => PropertyTrimmer::with_default_keys(),
    }
}

fn write_document(path: &Path, document: &str) -> Result<(), ExportError> {
    let io = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io)?;
    }
    fs::write(path, document).map_err(io)
}
