//! Error types for the dinus-reco front end.

/// Top-level error type for the application shell.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Failure reported by the recommendation client.
    #[error(transparent)]
    Client(#[from] reco_client::RecoError),

    /// Configuration file could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A newer search replaced this one before it finished.
    #[error("search was superseded by a newer search")]
    Superseded,

    /// A command referred to a result that is not visible.
    #[error("no citation at position {0}")]
    NoSuchCitation(usize),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
