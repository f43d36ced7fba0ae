//! Error types for the reco-client crate.
//!
//! Messages are stable lower-case strings suitable for logs. The view layer
//! never shows them verbatim; it shows [`GENERIC_FAILURE_MESSAGE`] instead.

/// Message recorded in the view when a search fails for any transport reason.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "failed to load recommendations; check that the recommendation service is reachable";

/// Maximum number of response-body characters kept in a [`RecoError::Status`].
pub const MAX_ERROR_BODY_CHARS: usize = 800;

/// Errors that can occur while talking to the recommendation service or
/// acting on its results.
#[derive(Debug, thiserror::Error)]
pub enum RecoError {
    /// The query was rejected before any request was made.
    #[error("invalid query: {0}")]
    Validation(String),

    /// The service answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        /// Request path, e.g. `/recommend/citations`.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body text, truncated.
        body: String,
    },

    /// The request never produced a response (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body was not the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The service returned 2xx with an `error` field in the body.
    #[error("service error: {0}")]
    Service(String),

    /// Writing to the system clipboard failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Opening a share target failed.
    #[error("share error: {0}")]
    Share(String),

    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl RecoError {
    /// Whether this error came from one of the recommendation calls.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Status { .. } | Self::Http(_) | Self::Parse(_) | Self::Service(_)
        )
    }

    /// Build a [`RecoError::Status`], truncating the body.
    pub fn status(endpoint: &str, status: u16, body: &str) -> Self {
        Self::Status {
            endpoint: endpoint.to_owned(),
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

/// Convenience type alias for reco-client results.
pub type Result<T> = std::result::Result<T, RecoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_status() {
        let err = RecoError::status("/recommend/citations", 503, "unavailable");
        assert_eq!(
            err.to_string(),
            "/recommend/citations returned HTTP 503: unavailable"
        );
    }

    #[test]
    fn status_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS + 50);
        match RecoError::status("/health", 500, &body) {
            RecoError::Status { body, .. } => assert_eq!(body.len(), MAX_ERROR_BODY_CHARS),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn display_service() {
        let err = RecoError::Service("BM25 index belum ada".into());
        assert_eq!(err.to_string(), "service error: BM25 index belum ada");
    }

    #[test]
    fn transport_classification() {
        assert!(RecoError::Http("refused".into()).is_transport());
        assert!(RecoError::Parse("eof".into()).is_transport());
        assert!(RecoError::status("/x", 404, "").is_transport());
        assert!(RecoError::Service("down".into()).is_transport());
        assert!(!RecoError::Clipboard("no tool".into()).is_transport());
        assert!(!RecoError::Validation("short".into()).is_transport());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecoError>();
    }
}
