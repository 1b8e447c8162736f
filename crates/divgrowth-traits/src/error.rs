//! Error types for the divgrowth engine.
//!
//! Metric computations never fail: an undefined metric is `None`. The errors
//! here cover the edges of the engine, where raw records are validated and
//! snapshots are loaded from a store.

use thiserror::Error;

/// The main error type for divgrowth operations.
#[derive(Debug, Error)]
pub enum DivgrowthError {
    /// A record is malformed (missing field, non-positive split ratio, ...).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A date could not be parsed or is out of range.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The requested security is not present in the source.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// I/O failure while reading a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for DivgrowthError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for DivgrowthError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for divgrowth operations.
pub type Result<T> = std::result::Result<T, DivgrowthError>;
