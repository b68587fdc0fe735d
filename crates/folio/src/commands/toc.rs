//! `folio toc` command implementation.

use clap::Args;
use folio_blocks::{HeadingEntry, outline};

use super::{Session, TreeArgs};
use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the toc command.
#[derive(Args)]
pub(crate) struct TocArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
}

impl TocArgs {
    /// Execute the toc command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or fetching fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = Session::open(&self.tree, &output)?;

        let loaded = session.exporter().load_tree(&self.tree.root_id)?;
        let entries = outline(&loaded.tree);
        if entries.is_empty() {
            output.line(Tone::Caution, "No headings found.");
            return Ok(());
        }

        for line in format_outline(&entries) {
            output.line(Tone::Plain, &line);
        }
        Ok(())
    }
}

/// Outline lines indented by heading level, each with its anchor.
fn format_outline(entries: &[HeadingEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
            format!("{indent}- {} (#{})", entry.text, entry.id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(level: u8, text: &str, id: &str) -> HeadingEntry {
        HeadingEntry {
            level,
            text: text.to_owned(),
            id: id.to_owned(),
        }
    }

    #[test]
    fn test_format_outline_indents_by_level() {
        let entries = [
            entry(1, "Intro", "a"),
            entry(2, "Setup", "b"),
            entry(3, "Tokens", "c"),
            entry(1, "Usage", "d"),
        ];

        assert_eq!(
            format_outline(&entries),
            [
                "- Intro (#a)",
                "  - Setup (#b)",
                "    - Tokens (#c)",
                "- Usage (#d)",
            ]
        );
    }
}
