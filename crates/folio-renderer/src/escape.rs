/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape text content and turn line breaks into `<br>`.
pub(crate) fn escape_text(s: &str) -> String {
    escape_html(s).replace('\n', "<br>")
}

/// Schemes allowed in link targets. Links without a scheme are relative and
/// always allowed.
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// `url` if it is safe to emit as an `href`.
///
/// Browsers drop tabs and line breaks inside URLs, so they are ignored when
/// reading the scheme.
pub(crate) fn safe_href(url: &str) -> Option<&str> {
    let cleaned: String = url
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let Some((scheme, _)) = cleaned.split_once(':') else {
        return Some(url);
    };
    if !is_scheme(scheme) {
        return Some(url);
    }
    LINK_SCHEMES
        .iter()
        .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
        .then_some(url)
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
