//! Display-ready projections of single results.

use serde::Serialize;

use crate::types::{non_blank, CitationResult, SupervisorResult};

use super::citation::{format_citation_apa, format_citation_ieee};
use super::highlight::highlight_terms;
use super::share::{build_share_text, share_url, SHARE_UNTITLED};

/// Matched-term chips shown per card.
pub const MAX_TERM_CHIPS: usize = 10;
/// Sample publications shown per supervisor.
pub const MAX_SAMPLES: usize = 3;
/// Supervisor name placeholder.
pub const UNNAMED_SUPERVISOR: &str = "(Tanpa nama)";
/// Sample label placeholder when neither title nor id is present.
pub const SAMPLE_PLACEHOLDER: &str = "Publikasi";

/// Everything needed to render one citation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationCard {
    pub doc_id: String,
    pub title: String,
    pub url: Option<String>,
    /// `score` to four decimals.
    pub score: String,
    /// `score2` to four decimals, when present.
    pub score2: Option<String>,
    pub date: Option<String>,
    pub source: Option<String>,
    /// Abstract with matched terms in `<b>`; empty when there is no abstract.
    pub evidence_html: String,
    pub matched_terms: Vec<String>,
    pub apa: String,
    pub ieee: String,
    pub share_text: String,
    pub share_url: String,
}

impl CitationCard {
    pub fn from_result(item: &CitationResult) -> Self {
        let provided_html = item
            .explain
            .as_ref()
            .and_then(|e| non_blank(e.abstract_html.as_deref()))
            .map(str::to_owned);
        let evidence_html = provided_html.unwrap_or_else(|| {
            highlight_terms(item.abstract_text().unwrap_or_default(), item.matched_terms())
        });
        let share_text = build_share_text(item);

        Self {
            doc_id: item.doc_id.clone(),
            title: non_blank(item.title.as_deref())
                .unwrap_or(SHARE_UNTITLED)
                .to_owned(),
            url: non_blank(item.url.as_deref()).map(str::to_owned),
            score: format!("{:.4}", item.score),
            score2: item.score2.map(|s| format!("{s:.4}")),
            date: non_blank(item.date.as_deref()).map(str::to_owned),
            source: non_blank(item.source.as_deref()).map(str::to_owned),
            evidence_html,
            matched_terms: item
                .matched_terms()
                .iter()
                .take(MAX_TERM_CHIPS)
                .cloned()
                .collect(),
            apa: format_citation_apa(item),
            ieee: format_citation_ieee(item),
            share_url: share_url(&share_text),
            share_text,
        }
    }
}

/// One sample publication line on a supervisor card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleLine {
    pub label: String,
    pub url: Option<String>,
    pub date: Option<String>,
}

/// Everything needed to render one supervisor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupervisorCard {
    pub name: String,
    pub score: String,
    pub similarity: Option<String>,
    pub pub_count: u32,
    pub matched_terms: Vec<String>,
    pub samples: Vec<SampleLine>,
}

impl SupervisorCard {
    pub fn from_result(item: &SupervisorResult) -> Self {
        let samples = item
            .samples
            .iter()
            .take(MAX_SAMPLES)
            .map(|s| SampleLine {
                label: non_blank(s.title.as_deref())
                    .or_else(|| non_blank(s.doc_id.as_deref()))
                    .unwrap_or(SAMPLE_PLACEHOLDER)
                    .to_owned(),
                url: non_blank(s.url.as_deref()).map(str::to_owned),
                date: non_blank(s.date.as_deref()).map(str::to_owned),
            })
            .collect();

        Self {
            name: non_blank(Some(&item.name))
                .unwrap_or(UNNAMED_SUPERVISOR)
                .to_owned(),
            score: format!("{:.4}", item.score),
            similarity: item.similarity.map(|s| format!("{s:.4}")),
            pub_count: item.pub_count.unwrap_or(0),
            matched_terms: item
                .matched_terms
                .iter()
                .take(MAX_TERM_CHIPS)
                .cloned()
                .collect(),
            samples,
        }
    }
}
