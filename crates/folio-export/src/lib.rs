//! Document export for Folio.
//!
//! [`Exporter`] ties the pipeline together: tree cache lookup, recursive
//! fetch, media resolution, property trimming, tree cache write, rendering,
//! and writing the result wrapped in a [`PageShell`].
//!
//! # Example
//!
//! ```ignore
//! use folio_export::Exporter;
//!
//! let report = Exporter::from_config(&config, &client, &cache, &downloader)
//!     .refresh(true)
//!     .export("59833787-2cf9-4fdf-8782-e53db20768a5")?;
//! println!("wrote {}", report.path.display());
//! ```

mod error;
mod exporter;
mod shell;

pub use error::ExportError;
pub use exporter::{ExportReport, Exporter, INDEX_FILE, LoadedTree, trimmer_for};
pub use shell::PageShell;
