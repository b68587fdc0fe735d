//! Block tree to HTML.

use folio_blocks::{
    Block, CalloutBlock, CodeBlock, HeadingEntry, Icon, LinkBlock, MediaBlock, Node, TableBlock,
    TableRowBlock, outline, plain_text,
};

use crate::escape::escape_html;
use crate::inline::{external_link, render_rich_text};

/// Result of rendering a tree.
#[derive(Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Headings of the document, in order. Each heading element carries its
    /// entry's `id` as anchor.
    pub toc: Vec<HeadingEntry>,
    /// Problems found while rendering (e.g., unsupported block types).
    pub warnings: Vec<String>,
}

/// Renders a block tree to an HTML fragment.
///
/// Rendering is a pure fold over the tree: the same tree always yields the
/// same bytes. Sibling blocks are separated by a newline. Consecutive list
/// items of the same kind are grouped into one `<ul>` or `<ol>`. Block types
/// without a renderer produce a visible placeholder and a warning.
///
/// # Example
///
/// ```
/// use folio_blocks::{Block, Node, RichText, TextBlock};
/// use folio_renderer::BlockRenderer;
///
/// let tree = vec![Node::new("p1", Block::Paragraph(TextBlock::new(vec![RichText::new("Hi")])))];
/// assert_eq!(BlockRenderer::new().render(&tree).html, "<p>Hi</p>");
/// ```
#[derive(Debug, Default)]
pub struct BlockRenderer {
    toc_title: Option<String>,
}

impl BlockRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading shown at the top of table of contents blocks.
    #[must_use]
    pub fn with_toc_title(mut self, title: impl Into<String>) -> Self {
        self.toc_title = Some(title.into());
        self
    }

    /// Render `tree` to HTML.
    pub fn render(&self, tree: &[Node]) -> RenderResult {
        let toc = outline(tree);
        let mut ctx = RenderContext {
            toc_title: self.toc_title.as_deref(),
            toc: &toc,
            warnings: Vec::new(),
        };
        let html = ctx.blocks(tree);
        let warnings = ctx.warnings;

        RenderResult {
            html,
            toc,
            warnings,
        }
    }
}

/// State threaded through one render pass.
struct RenderContext<'a> {
    toc_title: Option<&'a str>,
    toc: &'a [HeadingEntry],
    warnings: Vec<String>,
}

impl RenderContext<'_> {
    /// Render siblings, grouping runs of list items into list containers.
    fn blocks(&mut self, nodes: &[Node]) -> String {
        let mut parts = Vec::with_capacity(nodes.len());
        let mut rest = nodes;

        while let Some(first) = rest.first() {
            if let Some(tag) = list_tag(&first.block) {
                let run = rest
                    .iter()
                    .take_while(|n| list_tag(&n.block) == Some(tag))
                    .count();
                let items: Vec<_> = rest[..run].iter().map(|n| self.list_item(n)).collect();
                parts.push(format!("<{tag}>\n{}\n</{tag}>", items.join("\n")));
                rest = &rest[run..];
            } else {
                parts.push(self.block(first));
                rest = &rest[1..];
            }
        }

        parts.join("\n")
    }

    /// Render a block followed by its children.
    fn with_children(&mut self, fragment: String, node: &Node) -> String {
        if node.children().is_empty() {
            fragment
        } else {
            format!("{fragment}\n{}", self.blocks(node.children()))
        }
    }

    fn block(&mut self, node: &Node) -> String {
        match &node.block {
            Block::Paragraph(b) => {
                let fragment = format!("<p>{}</p>", render_rich_text(&b.rich_text));
                self.with_children(fragment, node)
            }
            Block::Heading1(b) | Block::Heading2(b) | Block::Heading3(b) => {
                let level = node.block.heading_level().unwrap_or(1);
                let fragment = format!(
                    r#"<h{level} id="{}">{}</h{level}>"#,
                    escape_html(&node.id),
                    render_rich_text(&b.rich_text)
                );
                self.with_children(fragment, node)
            }
            Block::BulletedListItem(_) | Block::NumberedListItem(_) => self.list_item(node),
            Block::Quote(b) => {
                let fragment =
                    format!("<blockquote>{}</blockquote>", render_rich_text(&b.rich_text));
                self.with_children(fragment, node)
            }
            Block::Toggle(b) => format!(
                r#"<details class="toggle"><summary class="toggle-title">{}</summary><div class="toggle-children">{}</div></details>"#,
                render_rich_text(&b.rich_text),
                self.blocks(node.children())
            ),
            Block::ToDo(b) => {
                let checked = if b.checked { " checked" } else { "" };
                let fragment = format!(
                    r#"<div class="to-do"><input type="checkbox" disabled{checked}> <label>{}</label></div>"#,
                    render_rich_text(&b.rich_text)
                );
                self.with_children(fragment, node)
            }
            Block::Callout(b) => self.callout(b, node),
            Block::Code(b) => self.with_children(code(b), node),
            Block::Equation(b) => {
                let fragment = format!(
                    r#"<div class="equation">\[{}\]</div>"#,
                    escape_html(&b.expression)
                );
                self.with_children(fragment, node)
            }
            Block::Image(b) => self.with_children(image(b), node),
            Block::Video(b) | Block::Audio(b) | Block::File(b) | Block::Pdf(b) => {
                self.with_children(media_link(node.kind(), b), node)
            }
            Block::Embed(b) => {
                let fragment = format!(
                    r#"<div class="embed-block">{}</div>"#,
                    external_link(&b.url, "EMBED link")
                );
                self.with_children(fragment, node)
            }
            Block::Bookmark(b) => self.with_children(bookmark("bookmark", b), node),
            Block::LinkPreview(b) => self.with_children(bookmark("link-preview", b), node),
            Block::Divider(_) => self.with_children("<hr>".to_owned(), node),
            Block::Breadcrumb(_) => {
                self.with_children(r#"<nav class="breadcrumb"></nav>"#.to_owned(), node)
            }
            Block::Table(b) => self.table(b, node),
            Block::TableRow(b) => table_row(b, false, false),
            Block::ColumnList(_) => self.container("column-list", node),
            Block::Column(_) => self.container("column", node),
            Block::SyncedBlock(_) => self.container("synced-block", node),
            Block::TableOfContents(_) => {
                let fragment = self.table_of_contents();
                self.with_children(fragment, node)
            }
            Block::ChildPage(b) => {
                let fragment = format!(
                    r#"<div class="child-page">{}</div>"#,
                    escape_html(&b.title)
                );
                self.with_children(fragment, node)
            }
            Block::ChildDatabase(b) => {
                let fragment = format!(
                    r#"<div class="child-database">{}</div>"#,
                    escape_html(&b.title)
                );
                self.with_children(fragment, node)
            }
            Block::Unsupported { kind, .. } => {
                tracing::debug!("no renderer for {kind} block {}", node.id);
                self.warnings
                    .push(format!("Unsupported block type: {kind} (block {})", node.id));
                let fragment = format!(
                    r#"<div class="unsupported-block">Unsupported block type: {}</div>"#,
                    escape_html(kind)
                );
                self.with_children(fragment, node)
            }
        }
    }

    /// `<li>` for a list item. Nested children go into a list whose tag
    /// follows the first child's type; children that do not start with a
    /// list item are rendered as ordinary blocks.
    fn list_item(&mut self, node: &Node) -> String {
        let text = node
            .block
            .rich_text()
            .map(render_rich_text)
            .unwrap_or_default();
        let children = node.children();

        let nested = match children.first().and_then(|c| list_tag(&c.block)) {
            Some(tag) => {
                let items: Vec<_> = children
                    .iter()
                    .map(|child| {
                        if child.block.is_list_item() {
                            self.list_item(child)
                        } else {
                            self.block(child)
                        }
                    })
                    .collect();
                format!("<{tag}>\n{}\n</{tag}>", items.join("\n"))
            }
            None if children.is_empty() => String::new(),
            None => self.blocks(children),
        };

        format!("<li>{text}{nested}</li>")
    }

    fn callout(&mut self, b: &CalloutBlock, node: &Node) -> String {
        let color = b.color.as_deref().unwrap_or("default");
        let icon = match &b.icon {
            Some(Icon {
                emoji: Some(emoji), ..
            }) => escape_html(emoji),
            Some(icon) => icon
                .url()
                .map(|url| format!(r#"<img src="{}" alt="">"#, escape_html(url)))
                .unwrap_or_default(),
            None => String::new(),
        };
        let children = if node.children().is_empty() {
            String::new()
        } else {
            format!("\n{}", self.blocks(node.children()))
        };

        format!(
            r#"<div class="callout callout-{}"><span class="callout-icon">{icon}</span><div class="callout-content">{}{children}</div></div>"#,
            escape_html(color),
            render_rich_text(&b.rich_text)
        )
    }

    /// `<table>` from the `table_row` children. Any other children follow
    /// the table.
    fn table(&mut self, b: &TableBlock, node: &Node) -> String {
        let rows: Vec<&TableRowBlock> = node
            .children()
            .iter()
            .filter_map(|child| match &child.block {
                Block::TableRow(row) => Some(row),
                _ => None,
            })
            .collect();

        let (head, body) = match rows.split_first() {
            Some((first, rest)) if b.has_column_header => (Some(*first), rest),
            _ => (None, rows.as_slice()),
        };

        let mut html = String::from("<table>");
        if let Some(row) = head {
            html.push_str("\n<thead>\n");
            html.push_str(&table_row(row, true, b.has_row_header));
            html.push_str("\n</thead>");
        }
        if !body.is_empty() {
            let rows: Vec<_> = body
                .iter()
                .map(|row| table_row(row, false, b.has_row_header))
                .collect();
            html.push_str("\n<tbody>\n");
            html.push_str(&rows.join("\n"));
            html.push_str("\n</tbody>");
        }
        html.push_str("\n</table>");

        let others: Vec<Node> = node
            .children()
            .iter()
            .filter(|child| !matches!(child.block, Block::TableRow(_)))
            .cloned()
            .collect();
        if !others.is_empty() {
            html.push('\n');
            html.push_str(&self.blocks(&others));
        }
        html
    }

    fn container(&mut self, class: &str, node: &Node) -> String {
        format!(
            r#"<div class="{class}">{}</div>"#,
            self.blocks(node.children())
        )
    }

    fn table_of_contents(&self) -> String {
        let mut html = String::from(r#"<nav class="table-of-contents">"#);
        if let Some(title) = self.toc_title {
            html.push_str(&format!("\n<h2>{}</h2>", escape_html(title)));
        }
        for entry in self.toc {
            html.push_str(&format!(
                "\n<a href=\"#{}\" class=\"toc-item level-{}\">{}</a>",
                escape_html(&entry.id),
                entry.level,
                escape_html(&entry.text)
            ));
        }
        html.push_str("\n</nav>");
        html
    }
}

/// List container tag for list item blocks.
fn list_tag(block: &Block) -> Option<&'static str> {
    match block {
        Block::BulletedListItem(_) => Some("ul"),
        Block::NumberedListItem(_) => Some("ol"),
        _ => None,
    }
}

fn code(b: &CodeBlock) -> String {
    let language = b.language.as_deref().unwrap_or("plain text");
    let pre = format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        escape_html(&language.replace(' ', "-")),
        escape_html(&plain_text(&b.rich_text))
    );
    if b.caption.is_empty() {
        pre
    } else {
        format!(
            r#"<figure class="code">{pre}<figcaption>{}</figcaption></figure>"#,
            render_rich_text(&b.caption)
        )
    }
}

fn image(b: &MediaBlock) -> String {
    let src = escape_html(b.url().unwrap_or_default());
    let alt = escape_html(&plain_text(&b.caption));
    let caption = if b.caption.is_empty() {
        String::new()
    } else {
        format!("<figcaption>{}</figcaption>", render_rich_text(&b.caption))
    };
    format!(r#"<figure class="image"><img src="{src}" alt="{alt}">{caption}</figure>"#)
}

/// Link to a video, audio, file or pdf block's media.
fn media_link(kind: &str, b: &MediaBlock) -> String {
    let label = b
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map_or_else(|| format!("{} link", kind.to_uppercase()), escape_html);
    let link = external_link(b.url().unwrap_or_default(), &label);
    format!(r#"<div class="{kind}-block">{link}</div>"#)
}

fn bookmark(class: &str, b: &LinkBlock) -> String {
    let link = external_link(&b.url, &escape_html(&b.url));
    let caption = if b.caption.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="{class}-caption">{}</div>"#,
            render_rich_text(&b.caption)
        )
    };
    format!(r#"<div class="{class}">{link}{caption}</div>"#)
}

fn table_row(row: &TableRowBlock, header: bool, row_header: bool) -> String {
    let cells: String = row
        .cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let content = render_rich_text(cell);
            if header {
                format!(r#"<th scope="col">{content}</th>"#)
            } else if row_header && i == 0 {
                format!(r#"<th scope="row">{content}</th>"#)
            } else {
                format!("<td>{content}</td>")
            }
        })
        .collect();
    format!("<tr>{cells}</tr>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_blocks::{Annotations, PlainBlock, RichText, TextBlock, TitleBlock, ToDoBlock};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn text(s: &str) -> TextBlock {
        TextBlock::new(vec![RichText::new(s)])
    }

    fn paragraph(id: &str, s: &str) -> Node {
        Node::new(id, Block::Paragraph(text(s)))
    }

    fn bullet(id: &str, s: &str) -> Node {
        Node::new(id, Block::BulletedListItem(text(s)))
    }

    fn numbered(id: &str, s: &str) -> Node {
        Node::new(id, Block::NumberedListItem(text(s)))
    }

    fn render(tree: &[Node]) -> String {
        BlockRenderer::new().render(tree).html
    }

    fn row(cells: &[&str]) -> Node {
        let cells = cells.iter().map(|c| vec![RichText::new(*c)]).collect();
        Node::new(
            "r",
            Block::TableRow(TableRowBlock {
                cells,
                ..TableRowBlock::default()
            }),
        )
    }

    #[test]
    fn test_bold_paragraph() {
        let run = RichText::new("bold").with_annotations(Annotations {
            bold: true,
            ..Annotations::default()
        });
        let tree = vec![Node::new("p", Block::Paragraph(TextBlock::new(vec![run])))];

        assert_eq!(render(&tree), "<p><strong>bold</strong></p>");
    }

    #[test]
    fn test_siblings_joined_by_newline() {
        let tree = vec![paragraph("a", "One"), paragraph("b", "Two")];
        assert_eq!(render(&tree), "<p>One</p>\n<p>Two</p>");
    }

    #[test]
    fn test_paragraph_children_follow() {
        let tree = vec![paragraph("a", "Parent").with_children(vec![paragraph("b", "Child")])];
        assert_eq!(render(&tree), "<p>Parent</p>\n<p>Child</p>");
    }

    #[test]
    fn test_headings_carry_anchor() {
        let tree = vec![
            Node::new("h1", Block::Heading1(text("Title"))),
            Node::new("h2", Block::Heading2(text("Part"))),
            Node::new("h3", Block::Heading3(text("Detail"))),
        ];
        assert_eq!(
            render(&tree),
            "<h1 id=\"h1\">Title</h1>\n<h2 id=\"h2\">Part</h2>\n<h3 id=\"h3\">Detail</h3>"
        );
    }

    #[test]
    fn test_consecutive_list_items_grouped() {
        let tree = vec![
            bullet("a", "A"),
            bullet("b", "B"),
            numbered("c", "C"),
            paragraph("p", "after"),
        ];
        assert_eq!(
            render(&tree),
            "<ul>\n<li>A</li>\n<li>B</li>\n</ul>\n<ol>\n<li>C</li>\n</ol>\n<p>after</p>"
        );
    }

    #[test]
    fn test_nested_list_tag_follows_first_child() {
        let tree = vec![bullet("a", "Steps").with_children(vec![
            numbered("a1", "first"),
            numbered("a2", "second"),
        ])];
        assert_eq!(
            render(&tree),
            "<ul>\n<li>Steps<ol>\n<li>first</li>\n<li>second</li>\n</ol></li>\n</ul>"
        );
    }

    #[test]
    fn test_list_item_with_non_list_children() {
        let tree = vec![bullet("a", "Item").with_children(vec![paragraph("p", "note")])];
        assert_eq!(render(&tree), "<ul>\n<li>Item<p>note</p></li>\n</ul>");
    }

    #[test]
    fn test_toggle_wraps_children() {
        let tree = vec![
            Node::new("t", Block::Toggle(text("More")))
                .with_children(vec![paragraph("p", "Hidden")]),
        ];
        assert_eq!(
            render(&tree),
            r#"<details class="toggle"><summary class="toggle-title">More</summary><div class="toggle-children"><p>Hidden</p></div></details>"#
        );
    }

    #[test]
    fn test_to_do() {
        let tree = vec![Node::new(
            "t",
            Block::ToDo(ToDoBlock {
                rich_text: vec![RichText::new("Ship")],
                checked: true,
                ..ToDoBlock::default()
            }),
        )];
        assert_eq!(
            render(&tree),
            r#"<div class="to-do"><input type="checkbox" disabled checked> <label>Ship</label></div>"#
        );
    }

    #[test]
    fn test_callout_with_emoji_and_children() {
        let tree = vec![
            Node::new(
                "c",
                Block::Callout(CalloutBlock {
                    rich_text: vec![RichText::new("Heads up")],
                    icon: Some(Icon {
                        kind: "emoji".to_owned(),
                        emoji: Some("💡".to_owned()),
                        ..Icon::default()
                    }),
                    color: Some("gray_background".to_owned()),
                    ..CalloutBlock::default()
                }),
            )
            .with_children(vec![paragraph("p", "Details")]),
        ];
        assert_eq!(
            render(&tree),
            "<div class=\"callout callout-gray_background\"><span class=\"callout-icon\">💡</span><div class=\"callout-content\">Heads up\n<p>Details</p></div></div>"
        );
    }

    #[test]
    fn test_code_escapes_plain_text() {
        let node = Node::from_value(json!({
            "id": "c", "type": "code",
            "code": {
                "rich_text": [{"type": "text", "plain_text": "if a < b {}",
                               "annotations": {"bold": true}}],
                "language": "rust", "caption": []
            }
        }))
        .unwrap();
        assert_eq!(
            render(&[node]),
            r#"<pre><code class="language-rust">if a &lt; b {}</code></pre>"#
        );
    }

    #[test]
    fn test_image_with_caption() {
        let node = Node::from_value(json!({
            "id": "i", "type": "image",
            "image": {
                "type": "file",
                "file": {"url": "images/image-1.png"},
                "caption": [{"type": "text", "plain_text": "A \"cat\""}]
            }
        }))
        .unwrap();
        assert_eq!(
            render(&[node]),
            r#"<figure class="image"><img src="images/image-1.png" alt="A &quot;cat&quot;"><figcaption>A &quot;cat&quot;</figcaption></figure>"#
        );
    }

    #[test]
    fn test_media_links() {
        let tree = vec![
            Node::new("v", Block::Video(MediaBlock::external("https://youtu.be/x"))),
            Node::new(
                "f",
                Block::File(MediaBlock {
                    name: Some("handbook.docx".to_owned()),
                    ..MediaBlock::hosted("https://files/handbook.docx")
                }),
            ),
        ];
        assert_eq!(
            render(&tree),
            "<div class=\"video-block\"><a href=\"https://youtu.be/x\" target=\"_blank\">VIDEO link</a></div>\n<div class=\"file-block\"><a href=\"https://files/handbook.docx\" target=\"_blank\">handbook.docx</a></div>"
        );
    }

    #[test]
    fn test_bookmark() {
        let tree = vec![Node::new(
            "b",
            Block::Bookmark(LinkBlock {
                url: "https://example.com/?a=1&b=2".to_owned(),
                ..LinkBlock::default()
            }),
        )];
        assert_eq!(
            render(&tree),
            r#"<div class="bookmark"><a href="https://example.com/?a=1&amp;b=2" target="_blank">https://example.com/?a=1&amp;b=2</a></div>"#
        );
    }

    #[test]
    fn test_block_links_with_script_scheme_are_not_linked() {
        let tree = vec![
            Node::new(
                "b",
                Block::Bookmark(LinkBlock {
                    url: "javascript:alert(1)".to_owned(),
                    ..LinkBlock::default()
                }),
            ),
            Node::new(
                "e",
                Block::Embed(LinkBlock {
                    url: "javascript:alert(1)".to_owned(),
                    ..LinkBlock::default()
                }),
            ),
            Node::new("v", Block::Video(MediaBlock::external("javascript:alert(1)"))),
        ];
        assert_eq!(
            render(&tree),
            "<div class=\"bookmark\">javascript:alert(1)</div>\n<div class=\"embed-block\">EMBED link</div>\n<div class=\"video-block\">VIDEO link</div>"
        );
    }

    #[test]
    fn test_table_with_headers() {
        let table = Node::new(
            "t",
            Block::Table(TableBlock {
                table_width: 2,
                has_column_header: true,
                has_row_header: true,
                ..TableBlock::default()
            }),
        )
        .with_children(vec![row(&["Name", "Role"]), row(&["Ada", "Engineer"])]);

        assert_eq!(
            render(&[table]),
            "<table>\n<thead>\n<tr><th scope=\"col\">Name</th><th scope=\"col\">Role</th></tr>\n</thead>\n<tbody>\n<tr><th scope=\"row\">Ada</th><td>Engineer</td></tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn test_table_without_header() {
        let table = Node::new("t", Block::Table(TableBlock::default()))
            .with_children(vec![row(&["a"]), row(&["b"])]);

        assert_eq!(
            render(&[table]),
            "<table>\n<tbody>\n<tr><td>a</td></tr>\n<tr><td>b</td></tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn test_columns() {
        let tree = vec![
            Node::new("cl", Block::ColumnList(PlainBlock::default())).with_children(vec![
                Node::new("c1", Block::Column(PlainBlock::default()))
                    .with_children(vec![paragraph("p1", "Left")]),
                Node::new("c2", Block::Column(PlainBlock::default()))
                    .with_children(vec![paragraph("p2", "Right")]),
            ]),
        ];
        assert_eq!(
            render(&tree),
            "<div class=\"column-list\"><div class=\"column\"><p>Left</p></div>\n<div class=\"column\"><p>Right</p></div></div>"
        );
    }

    #[test]
    fn test_table_of_contents_lists_headings() {
        let tree = vec![
            Node::new("toc", Block::TableOfContents(PlainBlock::default())),
            Node::new("h1", Block::Heading1(text("Intro & scope"))),
            Node::new("h2", Block::Heading2(text("Usage"))),
        ];
        let result = BlockRenderer::new().with_toc_title("Contents").render(&tree);

        assert!(result.html.starts_with(
            "<nav class=\"table-of-contents\">\n<h2>Contents</h2>\n<a href=\"#h1\" class=\"toc-item level-1\">Intro &amp; scope</a>\n<a href=\"#h2\" class=\"toc-item level-2\">Usage</a>\n</nav>"
        ));
        assert_eq!(result.toc.len(), 2);
    }

    #[test]
    fn test_child_page_title_escaped() {
        let tree = vec![Node::new(
            "cp",
            Block::ChildPage(TitleBlock {
                title: "Q&A".to_owned(),
                ..TitleBlock::default()
            }),
        )];
        assert_eq!(render(&tree), r#"<div class="child-page">Q&amp;A</div>"#);
    }

    #[test]
    fn test_unsupported_block_placeholder_and_warning() {
        let tree = vec![
            Node::from_value(json!({"id": "x", "type": "ai_block", "ai_block": {}})).unwrap(),
            paragraph("p", "still rendered"),
        ];
        let result = BlockRenderer::new().render(&tree);

        assert_eq!(
            result.html,
            "<div class=\"unsupported-block\">Unsupported block type: ai_block</div>\n<p>still rendered</p>"
        );
        assert_eq!(result.warnings, ["Unsupported block type: ai_block (block x)"]);
    }

    #[test]
    fn test_unsupported_block_children_follow_placeholder() {
        let tree = vec![
            Node::from_value(json!({"id": "x", "type": "ai_block", "ai_block": {}}))
                .unwrap()
                .with_children(vec![paragraph("p", "inside")]),
        ];
        assert_eq!(
            render(&tree),
            "<div class=\"unsupported-block\">Unsupported block type: ai_block</div>\n<p>inside</p>"
        );
    }

    fn titled(title: &str) -> TitleBlock {
        TitleBlock {
            title: title.to_owned(),
            ..TitleBlock::default()
        }
    }

    #[test]
    fn test_child_page_children_follow() {
        let tree = vec![
            Node::new("cp", Block::ChildPage(titled("Sub")))
                .with_children(vec![paragraph("p", "inside")]),
        ];
        assert_eq!(render(&tree), "<div class=\"child-page\">Sub</div>\n<p>inside</p>");
    }

    #[test]
    fn test_child_database_children_follow() {
        let tree = vec![
            Node::new("cd", Block::ChildDatabase(titled("Tasks")))
                .with_children(vec![paragraph("p", "inside")]),
        ];
        assert_eq!(
            render(&tree),
            "<div class=\"child-database\">Tasks</div>\n<p>inside</p>"
        );
    }

    #[test]
    fn test_divider_children_follow() {
        let tree = vec![
            Node::new("d", Block::Divider(PlainBlock::default()))
                .with_children(vec![paragraph("p", "inside")]),
        ];
        assert_eq!(render(&tree), "<hr>\n<p>inside</p>");
    }

    #[test]
    fn test_breadcrumb_children_follow() {
        let tree = vec![
            Node::new("b", Block::Breadcrumb(PlainBlock::default()))
                .with_children(vec![paragraph("p", "inside")]),
        ];
        assert_eq!(
            render(&tree),
            "<nav class=\"breadcrumb\"></nav>\n<p>inside</p>"
        );
    }

    #[test]
    fn test_table_of_contents_children_follow() {
        let tree = vec![
            Node::new("toc", Block::TableOfContents(PlainBlock::default()))
                .with_children(vec![paragraph("p", "inside")]),
        ];
        assert_eq!(
            render(&tree),
            "<nav class=\"table-of-contents\">\n</nav>\n<p>inside</p>"
        );
    }

    #[test]
    fn test_table_non_row_children_follow_table() {
        let table = Node::new("t", Block::Table(TableBlock::default()))
            .with_children(vec![row(&["a"]), paragraph("p", "note")]);

        assert_eq!(
            render(&[table]),
            "<table>\n<tbody>\n<tr><td>a</td></tr>\n</tbody>\n</table>\n<p>note</p>"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let tree = vec![
            Node::new("h", Block::Heading1(text("T"))),
            bullet("a", "A").with_children(vec![bullet("b", "B")]),
            Node::new("d", Block::Divider(PlainBlock::default())),
        ];
        let renderer = BlockRenderer::new();
        assert_eq!(renderer.render(&tree).html, renderer.render(&tree).html);
    }

    #[test]
    fn test_empty_tree() {
        let result = BlockRenderer::new().render(&[]);
        assert_eq!(result.html, "");
        assert!(result.toc.is_empty());
        assert!(result.warnings.is_empty());
    }
}
