//! APA and IEEE citation strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{non_blank, CitationResult, AUTHOR_FIELD_PRECEDENCE};

/// Used when none of the author candidates is present.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
/// Used in place of a year when the date is missing.
pub const NO_DATE: &str = "n.d.";
/// Used when the title is missing.
pub const UNTITLED: &str = "Untitled";
/// Publisher used when the source is missing.
pub const DEFAULT_SOURCE: &str = "UDINUS";

/// Supported citation styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    #[default]
    Apa,
    Ieee,
}

impl CitationStyle {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apa => "APA",
            Self::Ieee => "IEEE",
        }
    }

    /// Format `item` in this style.
    pub fn format(&self, item: &CitationResult) -> String {
        match self {
            Self::Apa => format_citation_apa(item),
            Self::Ieee => format_citation_ieee(item),
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apa" => Ok(Self::Apa),
            "ieee" => Ok(Self::Ieee),
            other => Err(format!("unknown citation style: {other}")),
        }
    }
}

/// First non-blank author candidate in [`AUTHOR_FIELD_PRECEDENCE`] order.
pub fn resolve_authors(item: &CitationResult) -> Option<String> {
    AUTHOR_FIELD_PRECEDENCE
        .iter()
        .find_map(|&field| item.author_field(field).and_then(|a| a.display()))
}

/// `{authors} ({year}). {title}. {source}.{ url}`
pub fn format_citation_apa(item: &CitationResult) -> String {
    let authors = resolve_authors(item).unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned());
    let year = item.year_prefix().unwrap_or_else(|| NO_DATE.to_owned());
    let title = non_blank(item.title.as_deref()).unwrap_or(UNTITLED);
    let source = non_blank(item.source.as_deref()).unwrap_or(DEFAULT_SOURCE);
    let url = non_blank(item.url.as_deref())
        .map(|u| format!(" {u}"))
        .unwrap_or_default();
    format!("{authors} ({year}). {title}. {source}.{url}")
}

/// `{authors}, "{title}," {year}, [Online]. Available: {url}.`
pub fn format_citation_ieee(item: &CitationResult) -> String {
    let authors = resolve_authors(item).unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned());
    let year = item.year_prefix().unwrap_or_else(|| NO_DATE.to_owned());
    let title = non_blank(item.title.as_deref()).unwrap_or(UNTITLED);
    let online = non_blank(item.url.as_deref())
        .map(|u| format!(", [Online]. Available: {u}"))
        .unwrap_or_default();
    format!("{authors}, \"{title},\" {year}{online}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthorList;

    fn item() -> CitationResult {
        let mut c = CitationResult::new("d1", 1.0);
        c.title = Some("X".into());
        c.date = Some("2022-01-01".into());
        c.source = Some("UDINUS".into());
        c
    }

    #[test]
    fn apa_without_author_or_url() {
        assert_eq!(format_citation_apa(&item()), "Unknown author (2022). X. UDINUS.");
    }

    #[test]
    fn apa_with_url_appends_space_and_url() {
        let mut c = item();
        c.url = Some(" https://repo.example/1 ".into());
        assert_eq!(
            format_citation_apa(&c),
            "Unknown author (2022). X. UDINUS. https://repo.example/1"
        );
    }

    #[test]
    fn apa_blank_url_not_appended() {
        let mut c = item();
        c.url = Some("   ".into());
        assert!(format_citation_apa(&c).ends_with("UDINUS."));
    }

    #[test]
    fn apa_placeholders() {
        let c = CitationResult::new("d", 0.0);
        assert_eq!(format_citation_apa(&c), "Unknown author (n.d.). Untitled. UDINUS.");
    }

    #[test]
    fn author_precedence_peneliti_first() {
        let mut c = item();
        c.author = Some(AuthorList::One("Author".into()));
        c.penulis = Some(AuthorList::One("Penulis".into()));
        assert_eq!(resolve_authors(&c).as_deref(), Some("Penulis"));
        c.peneliti = Some(AuthorList::One("Peneliti".into()));
        assert_eq!(resolve_authors(&c).as_deref(), Some("Peneliti"));
    }

    #[test]
    fn blank_candidate_skipped() {
        let mut c = item();
        c.peneliti = Some(AuthorList::One("  ".into()));
        c.authors = Some(AuthorList::Many(vec!["A. Rahman".into(), "S. Dewi".into()]));
        assert_eq!(resolve_authors(&c).as_deref(), Some("A. Rahman, S. Dewi"));
    }

    #[test]
    fn ieee_with_url() {
        let mut c = item();
        c.penulis = Some(AuthorList::One("B. Santoso".into()));
        c.url = Some("https://repo.example/2".into());
        assert_eq!(
            format_citation_ieee(&c),
            "B. Santoso, \"X,\" 2022, [Online]. Available: https://repo.example/2."
        );
    }

    #[test]
    fn ieee_without_url() {
        assert_eq!(format_citation_ieee(&item()), "Unknown author, \"X,\" 2022.");
    }

    #[test]
    fn style_dispatch_and_parse() {
        assert_eq!("IEEE".parse::<CitationStyle>(), Ok(CitationStyle::Ieee));
        assert!("mla".parse::<CitationStyle>().is_err());
        assert_eq!(CitationStyle::Apa.format(&item()), format_citation_apa(&item()));
    }
}
