//! Search session: the single view state and the operations that mutate it.
//!
//! Raw results are written only by [`SearchSession::run_query`]; sort mode,
//! result filter and reveal count only by their setters. The visible slice
//! is derived on demand by [`SearchSession::view`] and never stored.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{RecoError, GENERIC_FAILURE_MESSAGE};
use crate::projector::{Pagination, ProjectionKey, Projector};
use crate::service::RecommendationService;
use crate::types::{
    CitationResponse, CitationResult, ResultFilter, SortMode, SupervisorResponse,
    SupervisorResult,
};

use super::query::Query;

/// Both result lists from one completed search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendations {
    pub citations: Vec<CitationResult>,
    pub supervisors: Vec<SupervisorResult>,
}

/// How a call to [`SearchSession::run_query`] ended, short of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The query was too short; nothing was sent and the state is unchanged.
    Ignored,
    /// Both requests succeeded and their results are now the session's.
    Completed(Recommendations),
    /// A newer search started before this one finished. Its responses, if
    /// any arrived, were discarded.
    Superseded,
}

/// A started search: its validated query, generation and cancellation token.
#[derive(Debug)]
pub struct SearchTicket {
    query: Query,
    generation: u64,
    cancel: CancellationToken,
}

impl SearchTicket {
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Snapshot of what the view should display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// Last query that was issued.
    pub query: String,
    pub loading: bool,
    /// Generic message after a failed search.
    pub error: Option<String>,
    pub sort_mode: SortMode,
    pub filter: ResultFilter,
    pub auto_cutoff: bool,
    /// Preprocessed query tokens reported by the citation endpoint.
    pub tokens: Vec<String>,
    /// Tokens after the service's query expansion.
    pub expanded_tokens: Vec<String>,
    /// Visible citations in display order; empty when hidden by the filter.
    pub citations: Vec<CitationResult>,
    /// Length of the sorted (and, if enabled, cut off) citation list.
    pub total_citations: usize,
    pub can_load_more: bool,
    /// All supervisors; empty when hidden by the filter.
    pub supervisors: Vec<SupervisorResult>,
}

#[derive(Debug)]
struct SessionState {
    query: String,
    loading: bool,
    error: Option<String>,
    citations: Vec<CitationResult>,
    supervisors: Vec<SupervisorResult>,
    tokens: Vec<String>,
    expanded_tokens: Vec<String>,
    sort_mode: SortMode,
    filter: ResultFilter,
    auto_cutoff: bool,
    pagination: Pagination,
    /// Bumped whenever `citations` is replaced.
    revision: u64,
    /// Bumped whenever a search starts or is cancelled.
    generation: u64,
    in_flight: Option<CancellationToken>,
    projector: Projector,
}

impl SessionState {
    fn projection_key(&self, cutoff_max_keep: usize) -> ProjectionKey {
        ProjectionKey {
            revision: self.revision,
            sort_mode: self.sort_mode,
            cutoff: self.auto_cutoff.then_some(cutoff_max_keep),
        }
    }

    fn sorted_len(&mut self, cutoff_max_keep: usize) -> usize {
        let key = self.projection_key(cutoff_max_keep);
        self.projector.order(key, &self.citations).len()
    }

    fn replace_results(&mut self, citations: CitationResponse, supervisors: SupervisorResponse) {
        self.citations = citations.results;
        self.supervisors = supervisors.results;
        self.tokens = if citations.tokens.is_empty() {
            supervisors.tokens
        } else {
            citations.tokens
        };
        self.expanded_tokens = citations.expanded_tokens.unwrap_or_default();
        self.revision += 1;
    }

    fn clear_results(&mut self) {
        self.citations.clear();
        self.supervisors.clear();
        self.tokens.clear();
        self.expanded_tokens.clear();
        self.revision += 1;
    }
}

/// One user's search view over a recommendation service.
///
/// All methods take `&self`, so a session can be shared (e.g. in an `Arc`)
/// between the task issuing searches and the task rendering the view.
pub struct SearchSession<S> {
    service: Arc<S>,
    config: Arc<ClientConfig>,
    state: Mutex<SessionState>,
}

impl<S: RecommendationService> SearchSession<S> {
    pub fn new(service: Arc<S>, config: Arc<ClientConfig>) -> Self {
        let state = SessionState {
            query: String::new(),
            loading: false,
            error: None,
            citations: Vec::new(),
            supervisors: Vec::new(),
            tokens: Vec::new(),
            expanded_tokens: Vec::new(),
            sort_mode: SortMode::default(),
            filter: ResultFilter::default(),
            auto_cutoff: config.auto_cutoff,
            pagination: Pagination::new(config.page_size),
            revision: 0,
            generation: 0,
            in_flight: None,
            projector: Projector::new(),
        };
        Self {
            service,
            config,
            state: Mutex::new(state),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run both recommendation requests for `raw` concurrently and store
    /// their results.
    ///
    /// A query shorter than two characters after trimming is a no-op. On
    /// failure of either request both result lists are cleared, the view
    /// shows a generic error, and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecoError`] produced by either request.
    pub async fn run_query(&self, raw: &str) -> Result<QueryOutcome, RecoError> {
        match self.begin_query(raw) {
            Some(ticket) => self.complete(ticket).await,
            None => Ok(QueryOutcome::Ignored),
        }
    }

    /// Start a search for `raw` without awaiting it.
    ///
    /// The new generation is claimed and any in-flight search is cancelled
    /// before this returns, so searches started in sequence supersede each
    /// other in that order no matter when their tickets are completed.
    /// Returns `None` for a query that is too short; nothing changes then.
    pub fn begin_query(&self, raw: &str) -> Option<SearchTicket> {
        let query = match Query::parse(raw) {
            Ok(query) => query,
            Err(err) => {
                tracing::trace!(error = %err, "ignoring query");
                return None;
            }
        };
        let (generation, cancel) = self.begin(&query);
        Some(SearchTicket {
            query,
            generation,
            cancel,
        })
    }

    /// Issue the requests for a ticket from [`SearchSession::begin_query`]
    /// and apply their results if the ticket is still current.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecoError`] produced by either request.
    pub async fn complete(&self, ticket: SearchTicket) -> Result<QueryOutcome, RecoError> {
        let SearchTicket {
            query,
            generation,
            cancel,
        } = ticket;
        tracing::debug!(generation, "issuing recommendation requests");
        tracing::trace!(generation, query = %query, "query text");

        let fetch = futures::future::try_join(
            self.service
                .recommend_citations(query.as_str(), self.config.citation_top_k),
            self.service
                .recommend_supervisors(query.as_str(), self.config.supervisor_top_k),
        );

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(generation, "search superseded before completion");
                return Ok(QueryOutcome::Superseded);
            }
            result = fetch => result,
        };

        self.finish(generation, result)
    }

    fn begin(&self, query: &Query) -> (u64, CancellationToken) {
        let mut state = self.lock();
        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        state.generation += 1;
        state.in_flight = Some(token.clone());
        state.query = query.as_str().to_owned();
        state.loading = true;
        state.error = None;
        state.pagination.reset();
        (state.generation, token)
    }

    fn finish(
        &self,
        generation: u64,
        result: Result<(CitationResponse, SupervisorResponse), RecoError>,
    ) -> Result<QueryOutcome, RecoError> {
        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(
                generation,
                current = state.generation,
                "discarding stale recommendation response"
            );
            return Ok(QueryOutcome::Superseded);
        }
        state.loading = false;
        state.in_flight = None;

        match result {
            Ok((citations, supervisors)) => {
                tracing::debug!(
                    generation,
                    citations = citations.results.len(),
                    supervisors = supervisors.results.len(),
                    "recommendations received"
                );
                let snapshot = Recommendations {
                    citations: citations.results.clone(),
                    supervisors: supervisors.results.clone(),
                };
                state.replace_results(citations, supervisors);
                Ok(QueryOutcome::Completed(snapshot))
            }
            Err(err) => {
                tracing::warn!(generation, error = %err, "recommendation request failed");
                state.clear_results();
                state.error = Some(GENERIC_FAILURE_MESSAGE.to_owned());
                Err(err)
            }
        }
    }

    /// Abandon the in-flight search, if any. Its response will not be applied.
    pub fn cancel_in_flight(&self) {
        let mut state = self.lock();
        if let Some(token) = state.in_flight.take() {
            token.cancel();
            state.generation += 1;
            state.loading = false;
        }
    }

    /// Change the citation order. Never triggers a request.
    pub fn set_sort_mode(&self, mode: SortMode) {
        self.lock().sort_mode = mode;
    }

    /// Change which categories are displayed. Never triggers a request.
    pub fn set_filter(&self, filter: ResultFilter) {
        self.lock().filter = filter;
    }

    /// Toggle the relevance cutoff on the citation list.
    pub fn set_auto_cutoff(&self, enabled: bool) {
        self.lock().auto_cutoff = enabled;
    }

    /// Reveal one more page of citations. Returns `false` when everything is
    /// already visible.
    pub fn load_more(&self) -> bool {
        let max_keep = self.config.cutoff_max_keep;
        let mut state = self.lock();
        let total = state.sorted_len(max_keep);
        state.pagination.load_more(total)
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Generation of the most recent search.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Derive the current view.
    pub fn view(&self) -> SessionView {
        let max_keep = self.config.cutoff_max_keep;
        let mut state = self.lock();
        let key = state.projection_key(max_keep);
        let state = &mut *state;
        let order = state.projector.order(key, &state.citations);
        let total_citations = order.len();
        let citations = if state.filter.shows_citations() {
            order
                .iter()
                .take(state.pagination.visible(total_citations))
                .map(|&i| state.citations[i].clone())
                .collect()
        } else {
            Vec::new()
        };
        let supervisors = if state.filter.shows_supervisors() {
            state.supervisors.clone()
        } else {
            Vec::new()
        };

        SessionView {
            query: state.query.clone(),
            loading: state.loading,
            error: state.error.clone(),
            sort_mode: state.sort_mode,
            filter: state.filter,
            auto_cutoff: state.auto_cutoff,
            tokens: state.tokens.clone(),
            expanded_tokens: state.expanded_tokens.clone(),
            citations,
            total_citations,
            can_load_more: state.pagination.can_load_more(total_citations),
            supervisors,
        }
    }

    /// The visible citation at `position` (0-based) in the current view.
    pub fn visible_citation(&self, position: usize) -> Option<CitationResult> {
        self.view().citations.into_iter().nth(position)
    }

    /// The raw citation list, in service order.
    pub fn raw_citations(&self) -> Vec<CitationResult> {
        self.lock().citations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory service: answers from fixed lists, optionally failing or
    /// sleeping, and counts calls.
    #[derive(Default)]
    struct FakeService {
        citations: Vec<CitationResult>,
        supervisors: Vec<SupervisorResult>,
        fail_citations: AtomicBool,
        slow_query: Option<(String, Duration)>,
        calls: AtomicUsize,
        last_top_k: Mutex<Vec<usize>>,
    }

    impl FakeService {
        async fn maybe_sleep(&self, query: &str) {
            if let Some((slow, delay)) = &self.slow_query {
                if slow == query {
                    tokio::time::sleep(*delay).await;
                }
            }
        }
    }

    impl RecommendationService for FakeService {
        async fn recommend_citations(
            &self,
            query: &str,
            top_k: usize,
        ) -> Result<CitationResponse, RecoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_top_k
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(top_k);
            self.maybe_sleep(query).await;
            if self.fail_citations.load(Ordering::SeqCst) {
                return Err(RecoError::status("/recommend/citations", 500, "index missing"));
            }
            let results = self
                .citations
                .iter()
                .cloned()
                .map(|mut c| {
                    c.keyword = Some(query.to_owned());
                    c
                })
                .collect();
            Ok(CitationResponse {
                results,
                tokens: vec![query.to_owned()],
                ..Default::default()
            })
        }

        async fn recommend_supervisors(
            &self,
            query: &str,
            top_k: usize,
        ) -> Result<SupervisorResponse, RecoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_top_k
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(top_k);
            self.maybe_sleep(query).await;
            Ok(SupervisorResponse {
                results: self.supervisors.clone(),
                tokens: vec![query.to_owned()],
            })
        }
    }

    fn citations(n: usize) -> Vec<CitationResult> {
        (0..n)
            .map(|i| CitationResult::new(format!("d{i}"), (n - i) as f64))
            .collect()
    }

    fn session(service: FakeService) -> SearchSession<FakeService> {
        SearchSession::new(Arc::new(service), Arc::new(ClientConfig::default()))
    }

    #[tokio::test]
    async fn short_query_is_ignored_without_requests() {
        let s = session(FakeService {
            citations: citations(3),
            ..Default::default()
        });
        for raw in ["", " ", "x", " y "] {
            assert_eq!(s.run_query(raw).await.expect("ok"), QueryOutcome::Ignored);
        }
        assert_eq!(s.service.calls.load(Ordering::SeqCst), 0);
        let view = s.view();
        assert!(view.query.is_empty());
        assert!(!view.loading);
        assert_eq!(s.generation(), 0);
    }

    #[tokio::test]
    async fn successful_query_stores_results_and_requests_fixed_caps() {
        let s = session(FakeService {
            citations: citations(3),
            supervisors: vec![SupervisorResult::new("Dr. A", 0.4)],
            ..Default::default()
        });
        let outcome = s.run_query("  sistem pakar ").await.expect("ok");
        match outcome {
            QueryOutcome::Completed(r) => {
                assert_eq!(r.citations.len(), 3);
                assert_eq!(r.supervisors.len(), 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let mut caps = s.service.last_top_k.lock().unwrap_or_else(|p| p.into_inner()).clone();
        caps.sort_unstable();
        assert_eq!(caps, vec![10, 50]);

        let view = s.view();
        assert_eq!(view.query, "sistem pakar");
        assert!(!view.loading);
        assert_eq!(view.tokens, vec!["sistem pakar".to_string()]);
        assert_eq!(view.citations.len(), 3);
        assert!(!view.can_load_more);
    }

    #[tokio::test]
    async fn visible_count_follows_pagination() {
        let s = session(FakeService {
            citations: citations(34),
            ..Default::default()
        });
        s.run_query("data mining").await.expect("ok");
        assert_eq!(s.view().citations.len(), 10);
        for n in 1..=4 {
            s.load_more();
            assert_eq!(s.view().citations.len(), (10 + 10 * n).min(34));
        }
        assert!(!s.load_more());
        assert!(!s.view().can_load_more);
    }

    #[tokio::test]
    async fn new_query_resets_reveal_count_and_replaces_results() {
        let s = session(FakeService {
            citations: citations(30),
            ..Default::default()
        });
        s.run_query("first").await.expect("ok");
        s.load_more();
        assert_eq!(s.view().citations.len(), 20);

        s.run_query("second").await.expect("ok");
        let view = s.view();
        assert_eq!(view.citations.len(), 10);
        assert_eq!(view.total_citations, 30);
        assert!(view
            .citations
            .iter()
            .all(|c| c.keyword.as_deref() == Some("second")));
    }

    #[tokio::test]
    async fn sort_change_does_not_requery() {
        let mut list = citations(3);
        list[2].date = Some("2024-01-01".into());
        let s = session(FakeService {
            citations: list,
            ..Default::default()
        });
        s.run_query("query").await.expect("ok");
        let calls = s.service.calls.load(Ordering::SeqCst);

        assert_eq!(s.view().citations[0].doc_id, "d0");
        s.set_sort_mode(SortMode::YearDesc);
        assert_eq!(s.view().citations[0].doc_id, "d2");
        assert_eq!(s.service.calls.load(Ordering::SeqCst), calls);
        // The raw list keeps service order.
        assert_eq!(s.raw_citations()[0].doc_id, "d0");
    }

    #[tokio::test]
    async fn failed_citations_clear_both_lists() {
        let s = session(FakeService {
            citations: citations(3),
            supervisors: vec![SupervisorResult::new("Dr. A", 0.4)],
            ..Default::default()
        });
        s.run_query("before").await.expect("ok");
        assert_eq!(s.view().supervisors.len(), 1);

        s.service.fail_citations.store(true, Ordering::SeqCst);
        let err = s.run_query("after").await.unwrap_err();
        assert!(err.is_transport());
        let view = s.view();
        assert_eq!(view.query, "after");
        assert!(view.supervisors.is_empty());
        assert!(view.citations.is_empty());
        assert!(!view.loading);
        assert_eq!(view.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));

        s.service.fail_citations.store(false, Ordering::SeqCst);
        s.run_query("again").await.expect("ok");
        assert!(s.view().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_does_not_overwrite_newer_query() {
        let s = session(FakeService {
            citations: citations(2),
            slow_query: Some(("slow query".into(), Duration::from_secs(5))),
            ..Default::default()
        });

        let (a, b) = tokio::join!(s.run_query("slow query"), async {
            tokio::task::yield_now().await;
            s.run_query("fast query").await
        });

        assert_eq!(a.expect("a"), QueryOutcome::Superseded);
        assert!(matches!(b.expect("b"), QueryOutcome::Completed(_)));
        let view = s.view();
        assert_eq!(view.query, "fast query");
        assert!(view
            .citations
            .iter()
            .all(|c| c.keyword.as_deref() == Some("fast query")));
    }

    #[tokio::test]
    async fn tickets_supersede_in_start_order() {
        let s = session(FakeService {
            citations: citations(2),
            ..Default::default()
        });
        assert!(s.begin_query("x").is_none());
        assert_eq!(s.generation(), 0);

        let first = s.begin_query("first").expect("valid");
        let second = s.begin_query("second").expect("valid");
        assert!(second.generation() > first.generation());
        assert_eq!(second.query().as_str(), "second");

        // Completing the newer ticket before the older one still leaves the
        // newer results in place.
        let b = s.complete(second).await.expect("b");
        assert!(matches!(b, QueryOutcome::Completed(_)));
        let a = s.complete(first).await.expect("a");
        assert_eq!(a, QueryOutcome::Superseded);

        let view = s.view();
        assert_eq!(view.query, "second");
        assert!(view
            .citations
            .iter()
            .all(|c| c.keyword.as_deref() == Some("second")));
    }

    #[tokio::test]
    async fn stale_generation_is_discarded() {
        let s = session(FakeService::default());
        let first = Query::parse("first").expect("valid");
        let second = Query::parse("second").expect("valid");
        let (gen_a, _) = s.begin(&first);
        let (gen_b, _) = s.begin(&second);
        assert!(gen_b > gen_a);

        let late = Ok((
            CitationResponse {
                results: citations(4),
                ..Default::default()
            },
            SupervisorResponse::default(),
        ));
        assert_eq!(s.finish(gen_a, late).expect("ok"), QueryOutcome::Superseded);
        let view = s.view();
        assert!(view.loading, "newer search still pending");
        assert!(view.citations.is_empty());
    }

    #[tokio::test]
    async fn cancel_in_flight_clears_loading() {
        let s = session(FakeService::default());
        let q = Query::parse("pending").expect("valid");
        let (generation, token) = s.begin(&q);
        s.cancel_in_flight();
        assert!(token.is_cancelled());
        assert!(!s.is_loading());
        assert!(s.generation() > generation);
    }

    #[tokio::test]
    async fn filter_hides_categories_without_requery() {
        let s = session(FakeService {
            citations: citations(2),
            supervisors: vec![SupervisorResult::new("Dr. A", 0.4)],
            ..Default::default()
        });
        s.run_query("query").await.expect("ok");
        let calls = s.service.calls.load(Ordering::SeqCst);

        s.set_filter(ResultFilter::SupervisorsOnly);
        let view = s.view();
        assert!(view.citations.is_empty());
        assert_eq!(view.supervisors.len(), 1);
        assert_eq!(view.total_citations, 2);

        s.set_filter(ResultFilter::CitationsOnly);
        let view = s.view();
        assert_eq!(view.citations.len(), 2);
        assert!(view.supervisors.is_empty());
        assert_eq!(s.service.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn auto_cutoff_hides_tail() {
        let mut list = citations(3);
        list.push(CitationResult::new("tail", 0.01));
        let s = session(FakeService {
            citations: list,
            ..Default::default()
        });
        s.run_query("query").await.expect("ok");
        assert_eq!(s.view().total_citations, 4);
        s.set_auto_cutoff(true);
        let view = s.view();
        assert!(view.auto_cutoff);
        assert!(view.citations.iter().all(|c| c.doc_id != "tail"));
    }

    #[tokio::test]
    async fn view_is_memoised_between_calls() {
        let s = session(FakeService {
            citations: citations(5),
            ..Default::default()
        });
        s.run_query("query").await.expect("ok");
        let _ = s.view();
        let _ = s.view();
        s.load_more();
        let _ = s.view();
        assert_eq!(s.lock().projector.recomputations(), 1);
        s.set_sort_mode(SortMode::YearDesc);
        let _ = s.view();
        assert_eq!(s.lock().projector.recomputations(), 2);
    }
}
