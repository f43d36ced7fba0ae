//! Client configuration with sensible defaults.
//!
//! [`ClientConfig`] is resolved once at startup and shared immutably by every
//! session. It controls where the recommendation service lives, how many
//! results to request, and the paging and acknowledgment behaviour of the
//! view.

use serde::{Deserialize, Serialize};

use crate::error::RecoError;

/// Loopback address of a locally running recommendation service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Largest `top_k` the service accepts.
pub const MAX_SERVICE_TOP_K: usize = 50;

/// Configuration for the recommendation client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the recommendation service, without a trailing slash.
    pub base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Cap requested from `/recommend/citations`. The service may return fewer.
    pub citation_top_k: usize,
    /// Fixed top-K requested from `/recommend/supervisors`.
    pub supervisor_top_k: usize,
    /// Initial reveal count and "load more" increment for citations.
    pub page_size: usize,
    /// How long the "copied" acknowledgment stays visible, in milliseconds.
    pub copy_ack_ms: u64,
    /// Hide the low-relevance tail of the citation list.
    pub auto_cutoff: bool,
    /// Upper bound on citations kept when `auto_cutoff` is on.
    pub cutoff_max_keep: usize,
    /// Custom User-Agent. If `None`, the crate name and version are sent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_seconds: 60,
            citation_top_k: 50,
            supervisor_top_k: 10,
            page_size: 10,
            copy_ack_ms: 1500,
            auto_cutoff: false,
            cutoff_max_keep: 30,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Returns a copy pointing at `base_url`, with trailing slashes removed.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `base_url` parses as an `http` or `https` URL
    /// - `timeout_seconds`, `page_size` and both `top_k` values are non-zero
    /// - both `top_k` values are at most [`MAX_SERVICE_TOP_K`]
    /// - `cutoff_max_keep` is non-zero
    pub fn validate(&self) -> Result<(), RecoError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| RecoError::Config(format!("base_url is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RecoError::Config(format!(
                "base_url must use http or https, got {}",
                parsed.scheme()
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(RecoError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(RecoError::Config("page_size must be greater than 0".into()));
        }
        for (name, value) in [
            ("citation_top_k", self.citation_top_k),
            ("supervisor_top_k", self.supervisor_top_k),
        ] {
            if value == 0 || value > MAX_SERVICE_TOP_K {
                return Err(RecoError::Config(format!(
                    "{name} must be between 1 and {MAX_SERVICE_TOP_K}"
                )));
            }
        }
        if self.cutoff_max_keep == 0 {
            return Err(RecoError::Config(
                "cutoff_max_keep must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Trim whitespace and trailing slashes from a base URL.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}
