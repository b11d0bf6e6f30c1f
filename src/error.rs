//! Error types for the finance advisor

use thiserror::Error;

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {

    // =============================
    // Turn Pipeline Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The classifier could not reach the LLM; the turn cannot be routed.
    #[error("Intent classification unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Transport-level failures of the market-data provider.
///
/// Payload-level outcomes (provider error text, rate limiting, missing data)
/// are not errors; see [`crate::market_data::DailySeries`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("{0}")]
    Transport(String),
}
