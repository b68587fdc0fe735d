//! HTML rendering for Folio block trees.
//!
//! [`BlockRenderer`] folds a tree into an HTML fragment, collecting the
//! heading outline and warnings on the way. Inline runs go through
//! [`render_rich_text`].
//!
//! # Example
//!
//! ```
//! use folio_blocks::{Block, Node, RichText, TextBlock};
//! use folio_renderer::BlockRenderer;
//!
//! let tree = vec![
//!     Node::new("h", Block::Heading1(TextBlock::new(vec![RichText::new("Intro")]))),
//!     Node::new("p", Block::Paragraph(TextBlock::new(vec![RichText::new("Body")]))),
//! ];
//! let result = BlockRenderer::new().render(&tree);
//!
//! assert_eq!(result.html, "<h1 id=\"h\">Intro</h1>\n<p>Body</p>");
//! assert_eq!(result.toc[0].text, "Intro");
//! ```

mod escape;
mod inline;
mod renderer;

pub use escape::escape_html;
pub use inline::render_rich_text;
pub use renderer::{BlockRenderer, RenderResult};
