//! # reco-client
//!
//! Client-side orchestration for the DINUS research recommendation service.
//!
//! The ranking itself (BM25 for citations, TF-IDF profiles for supervisors)
//! runs in the external service. This crate owns everything between the
//! user's query and the rendered list:
//!
//! - Issues the citation and supervisor requests concurrently and stores
//!   their results wholesale, guarding against late responses from
//!   superseded searches
//! - Derives the visible citation slice (sort, optional relevance cutoff,
//!   incremental reveal) without mutating the raw results
//! - Formats single results for display: APA/IEEE strings, share text,
//!   highlighted evidence, and copy/share actions
//!
//! ## Security
//!
//! - Query text is logged only at trace level
//! - Abstract text is HTML-escaped before highlighting

pub mod actions;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod present;
pub mod projector;
pub mod service;
pub mod types;

pub use actions::{Clipboard, CopyAcknowledgment, CopyTarget, ShareLauncher};
pub use config::ClientConfig;
pub use error::{RecoError, Result};
pub use http::HttpRecommendationService;
pub use orchestrator::{
    Query, QueryOutcome, Recommendations, SearchSession, SearchTicket, SessionView,
};
pub use present::{CitationCard, CitationStyle, SupervisorCard};
pub use service::RecommendationService;
pub use types::{CitationResult, ResultFilter, SortMode, SupervisorResult};

use std::sync::Arc;

/// Build a session talking to the HTTP service described by `config`.
///
/// # Errors
///
/// Returns [`RecoError::Config`] if `config` fails validation, or
/// [`RecoError::Http`] if the HTTP client cannot be built.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> reco_client::Result<()> {
/// let session = reco_client::connect(reco_client::ClientConfig::default())?;
/// session.run_query("deteksi hoaks").await?;
/// for citation in session.view().citations {
///     println!("{}", reco_client::present::format_citation_apa(&citation));
/// }
/// # Ok(())
/// # }
/// ```
pub fn connect(config: ClientConfig) -> Result<SearchSession<HttpRecommendationService>> {
    let config = Arc::new(config);
    let service = HttpRecommendationService::new(Arc::clone(&config))?;
    Ok(SearchSession::new(Arc::new(service), config))
}
