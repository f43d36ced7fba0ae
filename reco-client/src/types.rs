//! Wire records returned by the recommendation service and the small enums
//! that drive the view.
//!
//! Field names follow the service's JSON (`judul`, `tanggal`, `dosen`, ...);
//! Rust-side names are English. Every metadata field is optional because the
//! service passes document metadata through as-is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Author-bearing field names, in the order they are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorField {
    /// `peneliti` (researcher).
    Peneliti,
    /// `penulis` (writer).
    Penulis,
    /// `authors`.
    Authors,
    /// `author`.
    Author,
}

/// Precedence used when resolving a citation's authors: the first candidate
/// that is present and non-blank wins.
pub const AUTHOR_FIELD_PRECEDENCE: [AuthorField; 4] = [
    AuthorField::Peneliti,
    AuthorField::Penulis,
    AuthorField::Authors,
    AuthorField::Author,
];

/// An author field as sent by the service: either one string or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorList {
    /// A single, pre-formatted author string.
    One(String),
    /// Individual author names.
    Many(Vec<String>),
}

impl AuthorList {
    /// Display form, or `None` when nothing non-blank is present.
    pub fn display(&self) -> Option<String> {
        let joined = match self {
            Self::One(s) => s.trim().to_owned(),
            Self::Many(names) => names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        (!joined.is_empty()).then_some(joined)
    }
}

/// Why a citation matched, as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explain {
    /// Query tokens that contributed to the score. Order is not meaningful.
    #[serde(default)]
    pub matched_terms: Vec<String>,
    /// Abstract fragment with matched terms already wrapped in `<b>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_html: Option<String>,
}

/// One recommended citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationResult {
    /// Unique within one response only.
    #[serde(deserialize_with = "lenient_required_string")]
    pub doc_id: String,
    /// BM25 relevance score.
    pub score: f64,
    /// Secondary score, when the service reranks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score2: Option<f64>,
    #[serde(default, rename = "judul", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Publication date, usually `YYYY-MM-DD`.
    #[serde(
        default,
        rename = "tanggal",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Indonesian-language abstract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstrak: Option<String>,
    /// English-language abstract.
    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<Explain>,
    /// Older service versions report matched terms at the top level.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peneliti: Option<AuthorList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penulis: Option<AuthorList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<AuthorList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorList>,
}

impl CitationResult {
    /// A citation with only the required fields set.
    pub fn new(doc_id: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
            score2: None,
            title: None,
            keyword: None,
            date: None,
            url: None,
            source: None,
            abstrak: None,
            abstract_en: None,
            explain: None,
            matched_terms: Vec::new(),
            peneliti: None,
            penulis: None,
            authors: None,
            author: None,
        }
    }

    /// The candidate stored under `field`, if any.
    pub fn author_field(&self, field: AuthorField) -> Option<&AuthorList> {
        match field {
            AuthorField::Peneliti => self.peneliti.as_ref(),
            AuthorField::Penulis => self.penulis.as_ref(),
            AuthorField::Authors => self.authors.as_ref(),
            AuthorField::Author => self.author.as_ref(),
        }
    }

    /// First four characters of the date, when a non-blank date exists.
    pub fn year_prefix(&self) -> Option<String> {
        non_blank(self.date.as_deref()).map(|d| d.chars().take(4).collect())
    }

    /// Publication year for sorting; 0 when missing or unparseable.
    pub fn year(&self) -> i32 {
        self.year_prefix()
            .and_then(|y| y.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Matched terms from `explain`, falling back to the top-level list.
    pub fn matched_terms(&self) -> &[String] {
        match &self.explain {
            Some(explain) if !explain.matched_terms.is_empty() => &explain.matched_terms,
            _ => &self.matched_terms,
        }
    }

    /// Raw abstract text, Indonesian first.
    pub fn abstract_text(&self) -> Option<&str> {
        non_blank(self.abstrak.as_deref()).or_else(|| non_blank(self.abstract_en.as_deref()))
    }
}

/// One sample publication attached to a supervisor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupervisorSample {
    #[serde(default, deserialize_with = "lenient_string")]
    pub doc_id: Option<String>,
    #[serde(default, rename = "judul")]
    pub title: Option<String>,
    #[serde(default, rename = "tanggal", deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One recommended supervisor ("dosbing").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorResult {
    /// Lecturer name; the identifier of this result.
    #[serde(default, rename = "dosen")]
    pub name: String,
    /// TF-IDF profile relevance.
    pub score: f64,
    /// Raw cosine similarity, when reported separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub matched_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_count: Option<u32>,
    /// Newest publications first.
    #[serde(default)]
    pub samples: Vec<SupervisorSample>,
}

impl SupervisorResult {
    /// A supervisor with only the required fields set.
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
            similarity: None,
            matched_terms: Vec::new(),
            pub_count: None,
            samples: Vec::new(),
        }
    }
}

/// Body of `/recommend/citations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationResponse {
    #[serde(default)]
    pub results: Vec<CitationResult>,
    /// Preprocessed query tokens.
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Tokens after pseudo-relevance expansion.
    #[serde(default)]
    pub expanded_tokens: Option<Vec<String>>,
    #[serde(default)]
    pub auto_k: Option<usize>,
    #[serde(default)]
    pub max_top_k: Option<usize>,
}

/// Body of `/recommend/supervisors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupervisorResponse {
    #[serde(default)]
    pub results: Vec<SupervisorResult>,
    #[serde(default)]
    pub tokens: Vec<String>,
}

/// Body of `/health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub bm25_loaded: bool,
    #[serde(default)]
    pub profiles_loaded: bool,
    /// Number of processed documents the service holds in memory.
    #[serde(default)]
    pub processed_docs_loaded: usize,
}

/// A suggested keyword with its supporting document count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSupport {
    pub term: String,
    pub count: u32,
}

/// Body of `/suggest/keywords`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSuggestions {
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub suggested_keywords: Vec<String>,
    #[serde(default)]
    pub support: Vec<KeywordSupport>,
    #[serde(default)]
    pub used_docs: Vec<String>,
}

/// Ordering applied to the citation list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Descending score, stable for ties.
    #[default]
    Relevance,
    /// Newest year first, then descending score.
    YearDesc,
}

impl SortMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::YearDesc => "year_desc",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" | "score" => Ok(Self::Relevance),
            "year_desc" | "year" | "newest" => Ok(Self::YearDesc),
            other => Err(format!("unknown sort mode: {other}")),
        }
    }
}

/// Which result categories are displayed. Purely a display filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFilter {
    #[default]
    Both,
    CitationsOnly,
    SupervisorsOnly,
}

impl ResultFilter {
    pub fn shows_citations(&self) -> bool {
        matches!(self, Self::Both | Self::CitationsOnly)
    }

    pub fn shows_supervisors(&self) -> bool {
        matches!(self, Self::Both | Self::SupervisorsOnly)
    }
}

impl FromStr for ResultFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "all" => Ok(Self::Both),
            "citations" | "sitasi" => Ok(Self::CitationsOnly),
            "supervisors" | "dosbing" => Ok(Self::SupervisorsOnly),
            other => Err(format!("unknown result filter: {other}")),
        }
    }
}

/// Returns `s` when it holds anything other than whitespace.
pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Accept strings, numbers and null for fields the service does not type strictly.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("doc_id must not be null"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citation_deserializes_service_shape() {
        let json = r#"{
            "doc_id": "D-17",
            "score": 7.25,
            "score2": 7.25,
            "judul": "Deteksi Hoaks",
            "tanggal": "2021-03-04",
            "url": "https://repo.example/17",
            "source": "dosbing",
            "explain": {"matched_terms": ["hoaks"], "abstract_html": "<b>hoaks</b>"},
            "penulis": ["A. Putra", "B. Sari"]
        }"#;
        let c: CitationResult = serde_json::from_str(json).expect("deserialize");
        assert_eq!(c.doc_id, "D-17");
        assert_eq!(c.title.as_deref(), Some("Deteksi Hoaks"));
        assert_eq!(c.year(), 2021);
        assert_eq!(c.matched_terms(), ["hoaks".to_string()]);
        assert_eq!(
            c.penulis.as_ref().and_then(AuthorList::display).as_deref(),
            Some("A. Putra, B. Sari")
        );
    }

    #[test]
    fn citation_without_score_is_rejected() {
        let result: Result<CitationResult, _> = serde_json::from_str(r#"{"doc_id":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn numeric_doc_id_and_date_accepted() {
        let c: CitationResult =
            serde_json::from_str(r#"{"doc_id": 42, "score": 1.0, "tanggal": 2019}"#)
                .expect("deserialize");
        assert_eq!(c.doc_id, "42");
        assert_eq!(c.year(), 2019);
    }

    #[test]
    fn year_is_zero_when_missing_or_garbage() {
        let mut c = CitationResult::new("a", 1.0);
        assert_eq!(c.year(), 0);
        c.date = Some("n/a".into());
        assert_eq!(c.year(), 0);
        c.date = Some("   ".into());
        assert_eq!(c.year(), 0);
        assert!(c.year_prefix().is_none());
    }

    #[test]
    fn matched_terms_fall_back_to_top_level() {
        let mut c = CitationResult::new("a", 1.0);
        c.matched_terms = vec!["jaringan".into()];
        c.explain = Some(Explain::default());
        assert_eq!(c.matched_terms(), ["jaringan".to_string()]);
    }

    #[test]
    fn abstract_prefers_indonesian() {
        let mut c = CitationResult::new("a", 1.0);
        c.abstract_en = Some("english".into());
        assert_eq!(c.abstract_text(), Some("english"));
        c.abstrak = Some("indonesia".into());
        assert_eq!(c.abstract_text(), Some("indonesia"));
    }

    #[test]
    fn author_list_blank_entries_ignored() {
        assert_eq!(AuthorList::One("  ".into()).display(), None);
        assert_eq!(AuthorList::Many(vec![" ".into(), String::new()]).display(), None);
        assert_eq!(
            AuthorList::Many(vec!["X".into(), " ".into(), "Y".into()]).display().as_deref(),
            Some("X, Y")
        );
    }

    #[test]
    fn supervisor_deserializes_service_shape() {
        let json = r#"{
            "dosen": "Dr. Nur",
            "score": 0.41,
            "similarity": 0.38,
            "matched_terms": ["citra", "segmentasi"],
            "pub_count": 12,
            "samples": [{"doc_id": "P1", "judul": "Segmentasi Citra", "tanggal": "2023-01-01"}]
        }"#;
        let s: SupervisorResult = serde_json::from_str(json).expect("deserialize");
        assert_eq!(s.name, "Dr. Nur");
        assert_eq!(s.pub_count, Some(12));
        assert_eq!(s.samples.len(), 1);
        assert_eq!(s.samples[0].title.as_deref(), Some("Segmentasi Citra"));
    }

    #[test]
    fn citation_response_optional_fields_default() {
        let r: CitationResponse = serde_json::from_str(r#"{"results": []}"#).expect("deserialize");
        assert!(r.tokens.is_empty());
        assert!(r.expanded_tokens.is_none());
        assert!(r.auto_k.is_none());
    }

    #[test]
    fn sort_mode_parsing() {
        assert_eq!("relevance".parse::<SortMode>(), Ok(SortMode::Relevance));
        assert_eq!("YEAR".parse::<SortMode>(), Ok(SortMode::YearDesc));
        assert_eq!("year_desc".parse::<SortMode>(), Ok(SortMode::YearDesc));
        assert!("alphabetical".parse::<SortMode>().is_err());
        assert_eq!(SortMode::YearDesc.to_string(), "year_desc");
    }

    #[test]
    fn result_filter_flags() {
        assert!(ResultFilter::Both.shows_citations());
        assert!(ResultFilter::Both.shows_supervisors());
        assert!(!ResultFilter::CitationsOnly.shows_supervisors());
        assert!(!ResultFilter::SupervisorsOnly.shows_citations());
        assert_eq!("dosbing".parse::<ResultFilter>(), Ok(ResultFilter::SupervisorsOnly));
    }

    #[test]
    fn precedence_order_is_fixed() {
        assert_eq!(
            AUTHOR_FIELD_PRECEDENCE,
            [
                AuthorField::Peneliti,
                AuthorField::Penulis,
                AuthorField::Authors,
                AuthorField::Author
            ]
        );
    }
}
