//! Standalone HTML document around a rendered fragment.

use std::fmt::Write;

use folio_config::OutputConfig;
use folio_renderer::escape_html;

/// Document shell: title, stylesheets and scripts around the body.
#[derive(Clone, Debug, Default)]
pub struct PageShell {
    pub title: String,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

impl PageShell {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Shell with the title and assets of the `[output]` section.
    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            title: config.title.clone(),
            stylesheets: config.stylesheets.clone(),
            scripts: config.scripts.clone(),
        }
    }

    /// Wrap `body` in a complete HTML document.
    pub fn wrap(&self, body: &str) -> String {
        let mut html = String::with_capacity(body.len() + 512);

        html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        let _ = writeln!(html, "<title>{}</title>", escape_html(&self.title));
        for href in &self.stylesheets {
            let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{}\">", escape_html(href));
        }
        html.push_str("</head>\n<body>\n<main class=\"folio-document\">\n");
        html.push_str(body);
        html.push_str("\n</main>\n");
        for src in &self.scripts {
            let _ = writeln!(html, "<script src=\"{}\"></script>", escape_html(src));
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}
