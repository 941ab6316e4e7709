//! Top-picks ranking engine.
//!
//! Scores a fixed universe of symbols by the probability of a short-horizon
//! upward move and serves the best ones over HTTP.

pub mod cancel;
pub mod classifier;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod services;

pub use config::{ScoringConfig, ServiceConfig};
pub use error::{InvalidRequestError, ScoringError, SourceError};
pub use models::{Pick, RankingResult, RawBar, ScoreOutcome, SymbolScore};
pub use scoring::{RankingService, SymbolScorer};
