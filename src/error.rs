//! Custom error types for the analysis core
//!
//! Scorers return `Result<Snapshot, AnalysisError>`; callers substitute the
//! documented default snapshot on `Err` instead of surfacing the error.

use thiserror::Error;

/// Errors raised while computing a scorer snapshot
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Not enough data for {component}: have {count}, need {required}")]
    InsufficientData {
        component: &'static str,
        count: usize,
        required: usize,
    },

    #[error("Indicator {indicator} is undefined at the last bar")]
    UndefinedIndicator { indicator: &'static str },

    #[error("Non-finite value in {context}")]
    NonFinite { context: &'static str },
}

/// Caller contract violations for the backtest simulator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Cannot backtest an empty price series")]
    EmptySeries,

    #[error("Backtest needs at least {required} bars, got {bars}")]
    InsufficientBars { bars: usize, required: usize },

    #[error("Signal count {signals} does not match bar count {bars}")]
    LengthMismatch { signals: usize, bars: usize },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors at the data-provider boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("Provider {provider} failed: {reason}")]
    Provider { provider: String, reason: String },

    #[error("No valid price bars for {symbol}")]
    EmptySeries { symbol: String },

    #[error("Analysis for {symbol} timed out after {millis}ms")]
    Timeout { symbol: String, millis: u128 },

    #[error("Analysis worker for {symbol} failed: {reason}")]
    Worker { symbol: String, reason: String },
}

/// Helper to check whether a scorer failure only reflects a short history
pub fn is_insufficient_data(error: &AnalysisError) -> bool {
    matches!(error, AnalysisError::InsufficientData { .. })
}
