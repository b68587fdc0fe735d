//! `folio stats` command implementation.

use std::collections::BTreeMap;

use clap::Args;
use folio_blocks::count_block_types;

use super::{Session, TreeArgs};
use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the stats command.
#[derive(Args)]
pub(crate) struct StatsArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
}

impl StatsArgs {
    /// Execute the stats command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or fetching fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = Session::open(&self.tree, &output)?;

        let loaded = session.exporter().load_tree(&self.tree.root_id)?;
        let counts = count_block_types(&loaded.tree);
        let total: usize = counts.values().sum();

        output.line(Tone::Title, &format!("{} ({total} blocks)", self.tree.root_id));
        for line in format_counts(&counts) {
            output.line(Tone::Plain, &line);
        }
        Ok(())
    }
}

/// One aligned line per block type, most frequent first.
fn format_counts(counts: &BTreeMap<String, usize>) -> Vec<String> {
    let width = counts.keys().map(String::len).max().unwrap_or(0);
    let mut entries: Vec<_> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .map(|(kind, count)| format!("  {kind:<width$}  {count:>5}"))
        .collect()
}
