//! Presentation adapter: display-ready fields for single results.
//!
//! Everything here is pure string formatting. The two effectful actions,
//! copying to the clipboard and opening a share target, live in
//! [`crate::actions`].

pub mod card;
pub mod citation;
pub mod highlight;
pub mod share;

pub use card::{CitationCard, SampleLine, SupervisorCard};
pub use citation::{format_citation_apa, format_citation_ieee, resolve_authors, CitationStyle};
pub use highlight::{highlight_terms, html_escape, to_plain_text};
pub use share::{build_share_text, share_url};
