//! Inline rich text rendering.
//!
//! Annotations always nest in the same order, innermost first:
//! `strong`, `em`, `s`, `u`, `code`, then a color `span`, then the link.
//! Output therefore does not depend on how the source ordered the
//! annotation keys.

use folio_blocks::{LinkMention, RichText, RichTextKind};

use crate::escape::{escape_html, escape_text, safe_href};

/// Render a run sequence to HTML.
pub fn render_rich_text(runs: &[RichText]) -> String {
    let mut out = String::new();
    for run in runs {
        render_run(run, &mut out);
    }
    out
}

fn render_run(run: &RichText, out: &mut String) {
    if let Some(mention) = run.link_mention() {
        render_link_mention(mention, out);
        return;
    }

    let mut html = match (run.kind, &run.equation) {
        (RichTextKind::Equation, Some(eq)) => {
            format!(r#"<span class="equation">\({}\)</span>"#, escape_html(&eq.expression))
        }
        _ => escape_text(run.plain()),
    };

    let a = &run.annotations;
    for (enabled, tag) in [
        (a.bold, "strong"),
        (a.italic, "em"),
        (a.strikethrough, "s"),
        (a.underline, "u"),
        (a.code, "code"),
    ] {
        if enabled {
            html = format!("<{tag}>{html}</{tag}>");
        }
    }

    if !a.has_default_color() {
        html = format!(
            r#"<span class="color-{}">{html}</span>"#,
            escape_html(&a.color)
        );
    }

    if let Some(href) = run.link() {
        html = external_link(href, &html);
    }

    out.push_str(&html);
}

/// Link opening in a new tab around already rendered `label`. Unsafe
/// targets leave the label unlinked.
pub(crate) fn external_link(url: &str, label: &str) -> String {
    match safe_href(url) {
        Some(href) => format!(
            r#"<a href="{}" target="_blank">{label}</a>"#,
            escape_html(href)
        ),
        None => {
            tracing::debug!("dropped link with unsafe target {url:?}");
            label.to_owned()
        }
    }
}

/// Composite element for a link mention: icon, provider and title.
///
/// A mention whose target is unsafe renders as its title alone.
fn render_link_mention(mention: &LinkMention, out: &mut String) {
    let title = escape_html(mention.title.as_deref().unwrap_or(&mention.href));
    let Some(href) = safe_href(&mention.href).map(escape_html) else {
        out.push_str(&title);
        return;
    };
    let tooltip = escape_html(mention.description.as_deref().unwrap_or_default());
    let provider = escape_html(mention.link_provider.as_deref().unwrap_or_default());
    let icon = mention
        .icon_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<img src="{}" alt="" class="inline-link-icon">"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    out.push_str(&format!(
        r#"<a href="{href}" class="inline-link-mention" target="_blank" rel="noopener noreferrer" title="{tooltip}">{icon}<span class="link-provider">{provider}</span> <strong class="link-title">{title}</strong></a>"#
    ));
}
