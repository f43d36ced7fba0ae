//! Plain-text rendering of the session view for a terminal.
//!
//! Everything goes through the display cards from `reco_client::present`,
//! so the terminal shows exactly the strings the copy and share actions use.

use std::fmt;

use reco_client::present::to_plain_text;
use reco_client::types::{HealthStatus, KeywordSuggestions};
use reco_client::{CitationCard, CopyTarget, SessionView, SupervisorCard};

/// Longest evidence excerpt printed under a citation, in characters.
pub const MAX_EVIDENCE_CHARS: usize = 360;

/// Display adapter for a whole [`SessionView`].
#[derive(Debug)]
pub struct ViewText<'a> {
    view: &'a SessionView,
    emphasis: &'a str,
    copied: Option<&'a CopyTarget>,
}

impl<'a> ViewText<'a> {
    pub fn new(view: &'a SessionView, emphasis: &'a str) -> Self {
        Self {
            view,
            emphasis,
            copied: None,
        }
    }

    /// Mark the card matching `target` as just copied.
    pub fn with_copied(mut self, target: Option<&'a CopyTarget>) -> Self {
        self.copied = target;
        self
    }
}

impl fmt::Display for ViewText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;
        if view.query.is_empty() {
            return writeln!(f, "Type a research topic (at least 2 characters).");
        }
        writeln!(
            f,
            "Query: {}  [sort: {}]{}",
            view.query,
            view.sort_mode,
            if view.auto_cutoff { " [cutoff]" } else { "" }
        )?;
        if view.loading {
            return writeln!(f, "Loading recommendations...");
        }
        if let Some(error) = &view.error {
            return writeln!(f, "Error: {error}");
        }

        if view.filter.shows_citations() {
            writeln!(f)?;
            writeln!(
                f,
                "Citations ({} of {})",
                view.citations.len(),
                view.total_citations
            )?;
            if view.citations.is_empty() {
                writeln!(f, "  No citations found.")?;
            }
            for (i, item) in view.citations.iter().enumerate() {
                let card = CitationCard::from_result(item);
                let copied = self
                    .copied
                    .filter(|t| t.doc_id == card.doc_id)
                    .map(|t| t.style);
                write_citation(f, i + 1, &card, self.emphasis, copied)?;
            }
            if view.can_load_more {
                writeln!(f, "  ... more available (:more)")?;
            }
        }

        if view.filter.shows_supervisors() {
            writeln!(f)?;
            writeln!(f, "Supervisors ({})", view.supervisors.len())?;
            if view.supervisors.is_empty() {
                writeln!(f, "  No supervisors found.")?;
            }
            for (i, item) in view.supervisors.iter().enumerate() {
                write_supervisor(f, i + 1, &SupervisorCard::from_result(item))?;
            }
        }
        Ok(())
    }
}

fn write_citation(
    f: &mut fmt::Formatter<'_>,
    position: usize,
    card: &CitationCard,
    emphasis: &str,
    copied: Option<reco_client::CitationStyle>,
) -> fmt::Result {
    let mut meta = vec![format!("score {}", card.score)];
    if let Some(score2) = &card.score2 {
        meta.push(format!("score2 {score2}"));
    }
    meta.extend(card.date.iter().cloned());
    meta.extend(card.source.iter().cloned());
    writeln!(f, "{position:>3}. {}  [{}]", card.title, meta.join(" | "))?;
    if let Some(url) = &card.url {
        writeln!(f, "     {url}")?;
    }
    if !card.matched_terms.is_empty() {
        writeln!(f, "     terms: {}", card.matched_terms.join(", "))?;
    }
    let evidence = to_plain_text(&card.evidence_html, emphasis);
    if !evidence.trim().is_empty() {
        writeln!(f, "     {}", excerpt(evidence.trim(), MAX_EVIDENCE_CHARS))?;
    }
    writeln!(f, "     APA:  {}", card.apa)?;
    writeln!(f, "     IEEE: {}", card.ieee)?;
    if let Some(style) = copied {
        writeln!(f, "     copied {}", style.name())?;
    }
    Ok(())
}

fn write_supervisor(
    f: &mut fmt::Formatter<'_>,
    position: usize,
    card: &SupervisorCard,
) -> fmt::Result {
    write!(f, "{position:>3}. {}  [score {}", card.name, card.score)?;
    if let Some(similarity) = &card.similarity {
        write!(f, " | similarity {similarity}")?;
    }
    writeln!(f, " | {} publications]", card.pub_count)?;
    if !card.matched_terms.is_empty() {
        writeln!(f, "     terms: {}", card.matched_terms.join(", "))?;
    }
    for sample in &card.samples {
        write!(f, "     - {}", sample.label)?;
        if let Some(date) = &sample.date {
            write!(f, " ({date})")?;
        }
        if let Some(url) = &sample.url {
            write!(f, " {url}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// Cut `text` to at most `max` characters, marking the cut.
pub fn excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_owned(),
    }
}

/// One line per view token list, for `:tokens`.
pub fn render_tokens(view: &SessionView) -> String {
    format!(
        "tokens: {}\nexpanded: {}\n",
        view.tokens.join(" "),
        view.expanded_tokens.join(" ")
    )
}

pub fn render_suggestions(suggestions: &KeywordSuggestions) -> String {
    if suggestions.suggested_keywords.is_empty() {
        return "No keyword suggestions.\n".to_owned();
    }
    let mut out = String::from("Suggested keywords:\n");
    for keyword in &suggestions.suggested_keywords {
        let count = suggestions
            .support
            .iter()
            .find(|s| &s.term == keyword)
            .map(|s| s.count);
        match count {
            Some(count) => out.push_str(&format!("  {keyword} ({count})\n")),
            None => out.push_str(&format!("  {keyword}\n")),
        }
    }
    out
}

pub fn render_health(base_url: &str, health: &HealthStatus) -> String {
    let flag = |b: bool| if b { "yes" } else { "no" };
    format!(
        "{base_url}: {}\n  bm25 index loaded: {}\n  supervisor profiles loaded: {}\n  processed documents: {}\n",
        if health.ok { "ok" } else { "not ok" },
        flag(health.bm25_loaded),
        flag(health.profiles_loaded),
        health.processed_docs_loaded
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reco_client::types::{Explain, KeywordSupport, SupervisorSample};
    use reco_client::{CitationResult, CitationStyle, ResultFilter, SortMode, SupervisorResult};

    fn view() -> SessionView {
        let mut citation = CitationResult::new("d1", 12.5);
        citation.title = Some("Sistem Pakar Diagnosa".into());
        citation.date = Some("2021-03-01".into());
        citation.abstrak = Some("Sistem pakar untuk diagnosa.".into());
        citation.explain = Some(Explain {
            matched_terms: vec!["pakar".into()],
            abstract_html: None,
        });
        let mut supervisor = SupervisorResult::new("Dr. Nur", 0.5);
        supervisor.samples = vec![SupervisorSample {
            doc_id: Some("s1".into()),
            ..Default::default()
        }];

        SessionView {
            query: "sistem pakar".into(),
            loading: false,
            error: None,
            sort_mode: SortMode::Relevance,
            filter: ResultFilter::Both,
            auto_cutoff: false,
            tokens: vec!["sistem".into(), "pakar".into()],
            expanded_tokens: vec![],
            citations: vec![citation],
            total_citations: 1,
            can_load_more: false,
            supervisors: vec![supervisor],
        }
    }

    #[test]
    fn renders_both_sections() {
        let text = ViewText::new(&view(), "*").to_string();
        assert!(text.contains("Citations (1 of 1)"));
        assert!(text.contains("1. Sistem Pakar Diagnosa  [score 12.5000 | 2021-03-01]"));
        assert!(text.contains("Sistem *pakar* untuk diagnosa."));
        assert!(text.contains("APA:  Unknown author (2021). Sistem Pakar Diagnosa. UDINUS."));
        assert!(text.contains("Supervisors (1)"));
        assert!(text.contains("Dr. Nur  [score 0.5000 | 0 publications]"));
        assert!(text.contains("- s1"));
    }

    #[test]
    fn filter_hides_section_headers() {
        let mut v = view();
        v.filter = ResultFilter::CitationsOnly;
        v.supervisors.clear();
        let text = ViewText::new(&v, "*").to_string();
        assert!(!text.contains("Supervisors"));
    }

    #[test]
    fn error_replaces_results() {
        let mut v = view();
        v.error = Some("failed to load recommendations".into());
        v.citations.clear();
        let text = ViewText::new(&v, "*").to_string();
        assert!(text.contains("Error: failed to load recommendations"));
        assert!(!text.contains("Citations"));
    }

    #[test]
    fn copied_marker_shown_on_matching_card() {
        let v = view();
        let target = CopyTarget {
            doc_id: "d1".into(),
            style: CitationStyle::Ieee,
        };
        let text = ViewText::new(&v, "*").with_copied(Some(&target)).to_string();
        assert!(text.contains("copied IEEE"));
    }

    #[test]
    fn empty_query_shows_prompt() {
        let v = SessionView {
            query: String::new(),
            ..view()
        };
        assert!(ViewText::new(&v, "*").to_string().starts_with("Type a research topic"));
    }

    #[test]
    fn excerpt_cuts_on_char_boundary() {
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("héllo", 10), "héllo");
        assert_eq!(excerpt("ééé", 2), "éé...");
    }

    #[test]
    fn suggestions_show_support_counts() {
        let s = KeywordSuggestions {
            tokens: vec![],
            suggested_keywords: vec!["berita".into(), "hoaks".into()],
            support: vec![KeywordSupport {
                term: "berita".into(),
                count: 4,
            }],
            used_docs: vec![],
        };
        assert_eq!(
            render_suggestions(&s),
            "Suggested keywords:\n  berita (4)\n  hoaks\n"
        );
    }
}
