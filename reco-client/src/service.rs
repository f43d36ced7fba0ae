//! Trait definition for the recommendation service seam.
//!
//! The session talks to the ranking backend only through
//! [`RecommendationService`]; the HTTP implementation lives in
//! [`crate::http`], and tests substitute in-memory fakes.

use crate::error::RecoError;
use crate::types::{CitationResponse, SupervisorResponse};

/// The two contracted recommendation operations.
///
/// Implementations must treat any non-success response as a hard failure
/// for that request rather than returning a partial result.
///
/// All implementations must be `Send + Sync` so both calls can be in flight
/// at once.
pub trait RecommendationService: Send + Sync {
    /// Rank citations for `query`, returning at most `top_k` results.
    ///
    /// The service may apply its own relevance cutoff, so callers must not
    /// assume `results.len() == top_k`.
    fn recommend_citations(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<CitationResponse, RecoError>> + Send;

    /// Rank supervisors for `query`, returning at most `top_k` results.
    fn recommend_supervisors(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<SupervisorResponse, RecoError>> + Send;
}
