//! CLI command implementations.

mod export;
mod stats;
mod toc;

use std::path::PathBuf;

use clap::Args;
use folio_cache::{Cache, FileCache, NullCache};
use folio_config::{CacheConfig, CliSettings, Config};
use folio_export::Exporter;
use folio_fetch::{BlockPage, BlockSource, FetchError, NotionClient};
use folio_media::HttpDownloader;

use crate::error::CliError;
use crate::output::{Output, Tone};

pub(crate) use export::ExportArgs;
pub(crate) use stats::StatsArgs;
pub(crate) use toc::TocArgs;

/// Version written to the cache directory. A new build starts from an
/// empty cache.
const CACHE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Arguments shared by every command that loads a tree.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Id of the root page or block.
    root_id: String,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ignore the cached tree and fetch from the API.
    #[arg(long)]
    refresh: bool,

    /// Disable caching.
    #[arg(long)]
    no_cache: bool,

    /// Fetch sibling subtrees in parallel.
    #[arg(long)]
    parallel: bool,

    /// Enable verbose output (request and cache logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl TreeArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            cache_enabled: self.no_cache.then_some(false),
            output_dir: self.output.clone(),
            parallel: self.parallel.then_some(true),
        }
    }
}

/// Explains how to configure the token when a fetch needs it.
const MISSING_TOKEN: &str = "notion.token is not configured, add \
    `token = \"${NOTION_API_KEY}\"` under [notion] in folio.toml";

/// Block source standing in for the API client when no token is
/// configured. Trees served from the cache never reach it.
struct MissingToken;

impl BlockSource for MissingToken {
    fn list_children(
        &self,
        node_id: &str,
        _cursor: Option<&str>,
    ) -> Result<BlockPage, FetchError> {
        Err(FetchError::SourceUnavailable {
            node_id: node_id.to_owned(),
            message: MISSING_TOKEN.to_owned(),
        })
    }
}

/// Loaded configuration and the collaborators built from it.
pub(crate) struct Session {
    config: Config,
    source: Box<dyn BlockSource>,
    cache: Box<dyn Cache>,
    downloader: HttpDownloader,
    refresh: bool,
}

impl Session {
    /// Load configuration and set up the block source, cache and downloader.
    ///
    /// A missing API token is not an error here: it only fails the command
    /// once a tree has to be fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub(crate) fn open(args: &TreeArgs, output: &Output) -> Result<Self, CliError> {
        let config = Config::load(args.config.as_deref(), Some(&args.cli_settings()))?;

        let source: Box<dyn BlockSource> = match config.notion.require_token() {
            Ok(token) => Box::new(NotionClient::new(&config.notion, token)),
            Err(e) => {
                tracing::debug!("{e}, only cached trees can be loaded");
                Box::new(MissingToken)
            }
        };
        let downloader = HttpDownloader::new(config.notion.timeout());
        let cache = open_cache(&config.cache_resolved, output);

        Ok(Self {
            config,
            source,
            cache,
            downloader,
            refresh: args.refresh,
        })
    }

    pub(crate) fn exporter(&self) -> Exporter<'_> {
        Exporter::from_config(
            &self.config,
            self.source.as_ref(),
            self.cache.as_ref(),
            &self.downloader,
        )
        .refresh(self.refresh)
    }
}

/// File cache when enabled and usable, otherwise a cache that never hits.
fn open_cache(config: &CacheConfig, output: &Output) -> Box<dyn Cache> {
    if !config.enabled {
        return Box::new(NullCache);
    }

    let cache = FileCache::new(config.dir.clone(), CACHE_VERSION);
    match cache.open() {
        Ok(()) => Box::new(cache),
        Err(e) => {
            output.line(
                Tone::Caution,
                &format!(
                    "Warning: caching disabled, cannot open {}: {e}",
                    config.dir.display()
                ),
            );
            Box::new(NullCache)
        }
    }
}
