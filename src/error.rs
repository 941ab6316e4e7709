//! Error taxonomy.
//!
//! Per-symbol errors (`SourceError`, `ScoringError`) never leave the scorer:
//! they become the reason of an unscoreable result. `InvalidRequestError` is
//! the only error a ranking request surfaces to its caller.

use thiserror::Error;

/// History retrieval failure.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected status {status} for {symbol}")]
    Status { symbol: String, status: u16 },

    #[error("provider error for {symbol}: {message}")]
    Api { symbol: String, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("history unavailable for {0}")]
    Unavailable(String),
}

/// Classifier fit/predict failure.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    #[error("no training samples")]
    EmptyTrainingSet,

    #[error("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("non-finite value in training features")]
    NonFiniteFeature,

    #[error("classifier produced a non-finite probability")]
    NonFiniteProbability,

    #[error("training cancelled")]
    Cancelled,
}

/// Why a symbol could not be scored.
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    #[error("history retrieval failed: {0}")]
    DataRetrieval(#[from] SourceError),

    #[error("history source returned no bars")]
    EmptyHistory,

    #[error("insufficient history: need {required} bars, got {provided}")]
    InsufficientHistory { required: usize, provided: usize },

    #[error("malformed history: {0}")]
    MalformedHistory(String),

    #[error("insufficient training window: need {required} rows, got {provided}")]
    InsufficientWindow { required: usize, provided: usize },

    #[error("training labels contain a single class")]
    DegenerateLabels,

    #[error("classifier failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("scoring cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ScoringError {
    /// Stable label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::DataRetrieval(_) => "data_retrieval",
            ScoringError::EmptyHistory => "empty_history",
            ScoringError::InsufficientHistory { .. } => "insufficient_history",
            ScoringError::MalformedHistory(_) => "malformed_history",
            ScoringError::InsufficientWindow { .. } => "insufficient_window",
            ScoringError::DegenerateLabels => "degenerate_labels",
            ScoringError::Classifier(_) => "classifier",
            ScoringError::Cancelled => "cancelled",
            ScoringError::Internal(_) => "internal",
        }
    }
}

/// Rejected ranking request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequestError {
    #[error("count must be a positive integer, got {0}")]
    NonPositiveCount(i64),

    #[error("count must be a positive integer, got {0:?}")]
    MalformedCount(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Parse { key: String, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
