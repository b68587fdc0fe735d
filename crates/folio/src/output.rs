//! Status lines on stderr.

use std::fmt::Display;

use console::{Style, Term};

/// What a status line reports. Decides how it is styled.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Tone {
    Plain,
    Done,
    Caution,
    Failure,
    Title,
}

impl Tone {
    fn style(self) -> Option<Style> {
        match self {
            Self::Plain => None,
            Self::Done => Some(Style::new().green()),
            Self::Caution => Some(Style::new().yellow()),
            Self::Failure => Some(Style::new().red().bold()),
            Self::Title => Some(Style::new().cyan().bold()),
        }
    }
}

/// Command progress and results, written to stderr so stdout stays free.
///
/// Writes are best effort: a closed stderr is not an error worth reporting.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub(crate) fn line(&self, tone: Tone, msg: &str) {
        let text = match tone.style() {
            Some(style) => style.apply_to(msg).to_string(),
            None => msg.to_owned(),
        };
        let _ = self.term.write_line(&text);
    }

    /// Titled bullet list. Prints nothing for an empty list.
    pub(crate) fn list<T: Display>(&self, tone: Tone, title: &str, items: &[T]) {
        let lines = list_lines(title, items);
        if let Some((heading, bullets)) = lines.split_first() {
            self.line(tone, heading);
            for bullet in bullets {
                self.line(Tone::Plain, bullet);
            }
        }
    }
}

/// Heading with the item count, then one bullet per item.
fn list_lines<T: Display>(title: &str, items: &[T]) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }
    std::iter::once(format!("\n{title} ({}):", items.len()))
        .chain(items.iter().map(|item| format!("  - {item}")))
        .collect()
}
