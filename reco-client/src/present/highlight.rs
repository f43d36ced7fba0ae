//! Evidence highlighting for abstracts.
//!
//! The service usually sends `explain.abstract_html` with matched terms
//! already bolded. When it does not, the card builds the same markup from
//! the raw abstract here.

use std::collections::BTreeSet;

use regex::Regex;

/// Terms shorter than this are never highlighted.
const MIN_TERM_CHARS: usize = 2;

/// Escape text for inclusion in HTML, quotes included.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and wrap every standalone occurrence of a matched term in
/// `<b>…</b>`.
///
/// Matching is case-insensitive and runs on the raw text; each piece is
/// escaped as it is written out. An occurrence counts only when the
/// characters on either side are not ASCII letters, digits or `_`. Longer
/// terms are applied first so that `"neural network"` wins over `"network"`,
/// and occurrences overlapping an earlier match are skipped.
pub fn highlight_terms(text: &str, terms: &[String]) -> String {
    if text.is_empty() {
        return String::new();
    }

    let unique: BTreeSet<&str> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| t.chars().count() >= MIN_TERM_CHARS)
        .collect();
    let mut ordered: Vec<&str> = unique.into_iter().collect();
    ordered.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for term in ordered {
        let Ok(re) = Regex::new(&format!("(?i){}", regex::escape(term))) else {
            continue;
        };
        collect_standalone(text, &re, &mut spans);
    }
    spans.sort_unstable();

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for (start, end) in spans {
        out.push_str(&html_escape(&text[copied..start]));
        out.push_str("<b>");
        out.push_str(&html_escape(&text[start..end]));
        out.push_str("</b>");
        copied = end;
    }
    out.push_str(&html_escape(&text[copied..]));
    out
}

fn collect_standalone(text: &str, re: &Regex, spans: &mut Vec<(usize, usize)>) {
    let mut pos = 0;
    while let Some(m) = re.find_at(text, pos) {
        if m.start() == m.end() {
            break;
        }
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        let taken = spans
            .iter()
            .any(|&(start, end)| m.start() < end && start < m.end());
        if is_word_char(before) || is_word_char(after) || taken {
            // Retry one character further on; a later overlap may still stand alone.
            pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        spans.push((m.start(), m.end()));
        pos = m.end();
    }
}

fn is_word_char(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render highlighted HTML for a terminal: `<b>` becomes `emphasis`, other
/// tags are dropped and the basic entities are decoded.
pub fn to_plain_text(html: &str, emphasis: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = rest[open + 1..open + close].trim().to_ascii_lowercase();
        if tag == "b" || tag == "/b" || tag == "strong" || tag == "/strong" {
            out.push_str(emphasis);
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);

    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
