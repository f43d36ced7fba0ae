//! HTTP implementation of the recommendation service.
//!
//! Provides a configured [`reqwest::Client`] and [`HttpRecommendationService`],
//! which posts `{"query", "top_k"}` JSON bodies to the service and maps every
//! failure mode onto [`RecoError`].

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::RecoError;
use crate::service::RecommendationService;
use crate::types::{CitationResponse, HealthStatus, KeywordSuggestions, SupervisorResponse};

/// Path of the citation recommendation endpoint.
pub const CITATIONS_PATH: &str = "/recommend/citations";
/// Path of the supervisor recommendation endpoint.
pub const SUPERVISORS_PATH: &str = "/recommend/supervisors";
/// Path of the keyword suggestion endpoint.
pub const SUGGEST_PATH: &str = "/suggest/keywords";
/// Path of the health probe.
pub const HEALTH_PATH: &str = "/health";

const DEFAULT_USER_AGENT: &str = concat!("reco-client/", env!("CARGO_PKG_VERSION"));

/// JSON body accepted by every query endpoint.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
}

/// Build a [`reqwest::Client`] for the recommendation service.
///
/// # Errors
///
/// Returns [`RecoError::Http`] if the client cannot be constructed.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, RecoError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .build()
        .map_err(|e| RecoError::Http(format!("failed to build HTTP client: {e}")))
}

/// [`RecommendationService`] backed by the recommendation HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRecommendationService {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl HttpRecommendationService {
    /// Validate `config` and build a client for it.
    pub fn new(config: Arc<ClientConfig>) -> Result<Self, RecoError> {
        config.validate()?;
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    /// The configuration this service was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Probe `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, RecoError> {
        let response = self
            .client
            .get(self.config.endpoint(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| RecoError::Http(format!("{HEALTH_PATH}: {e}")))?;
        read_response(HEALTH_PATH, response).await
    }

    /// Ask the service for refinement keywords related to `query`.
    pub async fn suggest_keywords(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<KeywordSuggestions, RecoError> {
        self.post_query(SUGGEST_PATH, query, top_k).await
    }

    async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        top_k: usize,
    ) -> Result<T, RecoError> {
        tracing::trace!(path, query, top_k, "posting query");
        let response = self
            .client
            .post(self.config.endpoint(path))
            .json(&QueryRequest { query, top_k })
            .send()
            .await
            .map_err(|e| RecoError::Http(format!("{path}: {e}")))?;
        read_response(path, response).await
    }
}

impl RecommendationService for HttpRecommendationService {
    async fn recommend_citations(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<CitationResponse, RecoError> {
        self.post_query(CITATIONS_PATH, query, top_k).await
    }

    async fn recommend_supervisors(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<SupervisorResponse, RecoError> {
        self.post_query(SUPERVISORS_PATH, query, top_k).await
    }
}

async fn read_response<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, RecoError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| RecoError::Http(format!("{path}: failed to read body: {e}")))?;
    parse_body(path, status, &body)
}

/// Turn a status code and body text into a typed response.
///
/// Non-2xx statuses become [`RecoError::Status`]; a 2xx body carrying a
/// string `error` field becomes [`RecoError::Service`].
pub fn parse_body<T: DeserializeOwned>(path: &str, status: u16, body: &str) -> Result<T, RecoError> {
    if !(200..300).contains(&status) {
        return Err(RecoError::status(path, status, body));
    }
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| RecoError::Parse(format!("{path}: {e}")))?;
    if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
        return Err(RecoError::Service(message.to_owned()));
    }
    serde_json::from_value(value).map_err(|e| RecoError::Parse(format!("{path}: {e}")))
}
