//! Error types for the forecasting service
//!
//! Every stage failure aborts the whole request; the server maps each
//! category to a status code but always returns the `{"error": message}`
//! JSON envelope.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, ForecastError>;

/// All error categories a forecast request can produce
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed or missing fields in the request body
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// Market data provider returned empty history for the ticker
    #[error("no data found for ticker {0}")]
    NoData(String),

    /// Available history is too short for the requested window/horizon
    #[error("insufficient history: {0}")]
    InsufficientData(String),

    /// Numerical failure during the training loop
    #[error("training failed: {0}")]
    Training(String),

    /// Market data request failed at the transport level
    #[error("market data request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Tensor operation failed inside the model stack
    #[error("tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}
