//! `folio export` command implementation.

use clap::Args;
use folio_export::ExportReport;

use super::{Session, TreeArgs};
use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, fetching or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = Session::open(&self.tree, &output)?;

        output.line(Tone::Plain, &format!("Exporting {}...", self.tree.root_id));
        let report = session.exporter().export(&self.tree.root_id)?;
        print_report(&output, &report);

        Ok(())
    }
}

fn print_report(output: &Output, report: &ExportReport) {
    output.line(Tone::Done, &format!("\nWrote {}", report.path.display()));
    if report.from_cache {
        output.line(
            Tone::Plain,
            "Tree loaded from cache (use --refresh to fetch again)",
        );
    } else {
        output.line(
            Tone::Plain,
            &format!(
                "Media: {} cached, {} downloaded",
                report.media.cached, report.media.downloaded
            ),
        );
    }
    output.line(Tone::Plain, &format!("Headings: {}", report.toc.len()));

    output.list(
        Tone::Caution,
        "Blocks whose media could not be downloaded",
        &report.media.failed,
    );
    output.list(Tone::Caution, "Warnings", &report.warnings);
}
