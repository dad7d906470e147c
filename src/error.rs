//! Error types for the energy analytics engine.

use thiserror::Error;

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ingestion, dashboard and configuration operations
#[derive(Debug, Error)]
pub enum Error {
    /// History store failure, passed through unchanged
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

/// History store errors
///
/// AnomalyDetector / TrendForecaster はこのエラーを加工せずに呼び出し元へ返す。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    /// Connection to the backing store failed
    #[error("History store connection error: {0}")]
    Connection(String),

    /// Query could not be executed
    #[error("History query error: {0}")]
    Query(String),

    /// Store is temporarily unavailable
    #[error("History store unavailable: {0}")]
    Unavailable(String),
}
