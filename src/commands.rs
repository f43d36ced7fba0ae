//! One-shot commands behind the CLI subcommands.
//!
//! Each runs a single search through a [`SearchSession`] and returns what
//! the binary prints, so the same paths are exercised by the tests.

use reco_client::actions::share_citation;
use reco_client::{
    CitationResult, CitationStyle, Clipboard, CopyAcknowledgment, HttpRecommendationService, Query,
    QueryOutcome, RecommendationService, ResultFilter, SearchSession, SessionView, ShareLauncher,
    SortMode,
};

use crate::error::{AppError, Result};
use crate::render::{ViewText, render_suggestions};

/// View options for `search`.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub sort: SortMode,
    pub show: ResultFilter,
    /// Extra pages to reveal beyond the first.
    pub more: usize,
    pub cutoff: bool,
}

/// Run `query` and fail on anything but a completed search.
///
/// # Errors
///
/// Returns the client error of a failed search, or a validation error when
/// the query is too short to be sent.
pub async fn run_search<S: RecommendationService>(
    session: &SearchSession<S>,
    query: &str,
) -> Result<()> {
    match session.run_query(query).await? {
        QueryOutcome::Completed(_) => Ok(()),
        QueryOutcome::Ignored => Err(reco_client::RecoError::Validation(format!(
            "query must be at least {} characters",
            reco_client::orchestrator::MIN_QUERY_CHARS
        ))
        .into()),
        QueryOutcome::Superseded => Err(AppError::Superseded),
    }
}

/// Search with `options` applied and return the resulting view.
pub async fn search_view<S: RecommendationService>(
    session: &SearchSession<S>,
    query: &str,
    options: &SearchOptions,
) -> Result<SessionView> {
    session.set_sort_mode(options.sort);
    session.set_filter(options.show);
    if options.cutoff {
        session.set_auto_cutoff(true);
    }
    run_search(session, query).await?;
    for _ in 0..options.more {
        if !session.load_more() {
            break;
        }
    }
    Ok(session.view())
}

/// Search and render the resulting view as text.
pub async fn search<S: RecommendationService>(
    session: &SearchSession<S>,
    query: &str,
    options: &SearchOptions,
    emphasis: &str,
) -> Result<String> {
    let view = search_view(session, query, options).await?;
    Ok(ViewText::new(&view, emphasis).to_string())
}

/// The citation shown at 1-based `position`, revealing pages as needed.
///
/// # Errors
///
/// Returns [`AppError::NoSuchCitation`] when fewer results exist.
pub fn citation_at<S: RecommendationService>(
    session: &SearchSession<S>,
    position: usize,
) -> Result<CitationResult> {
    if position == 0 {
        return Err(AppError::NoSuchCitation(0));
    }
    while session.view().citations.len() < position {
        if !session.load_more() {
            break;
        }
    }
    session
        .visible_citation(position - 1)
        .ok_or(AppError::NoSuchCitation(position))
}

/// Format the citation at `position`, copying it when a clipboard is given.
pub async fn cite<S: RecommendationService, C: Clipboard>(
    session: &SearchSession<S>,
    position: usize,
    style: CitationStyle,
    copy: Option<(&C, &CopyAcknowledgment)>,
) -> Result<String> {
    let item = citation_at(session, position)?;
    match copy {
        Some((clipboard, ack)) => Ok(ack.copy_citation(clipboard, &item, style).await?),
        None => Ok(style.format(&item)),
    }
}

/// WhatsApp share link for the citation at `position`, opened when a
/// launcher is given.
pub fn share<S: RecommendationService, L: ShareLauncher>(
    session: &SearchSession<S>,
    position: usize,
    launcher: Option<&L>,
) -> Result<String> {
    let item = citation_at(session, position)?;
    match launcher {
        Some(launcher) => Ok(share_citation(launcher, &item)?),
        None => {
            let text = reco_client::present::build_share_text(&item);
            Ok(reco_client::present::share_url(&text))
        }
    }
}

/// Keyword suggestions for `query`, rendered as text.
///
/// # Errors
///
/// Returns a validation error, without sending anything, when the query is
/// too short.
pub async fn suggest(
    service: &HttpRecommendationService,
    query: &str,
    top_k: usize,
) -> Result<String> {
    let query = Query::parse(query)?;
    let suggestions = service.suggest_keywords(query.as_str(), top_k).await?;
    Ok(render_suggestions(&suggestions))
}
