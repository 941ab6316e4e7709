//! Runtime configuration: environment lookup, scoring thresholds and service wiring.

use crate::classifier::ForestConfig;
use crate::error::ConfigError;
use crate::services::market_data::HistoryRequest;
use crate::services::yahoo::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Symbols ranked when `SYMBOLS` is not set.
pub const DEFAULT_UNIVERSE: [&str; 10] = [
    "AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META", "TSLA", "INTC", "AMD", "SPY",
];

/// Number of picks returned when the caller does not ask for a count.
pub const DEFAULT_PICK_COUNT: usize = 5;

/// Deployment environment (`ENVIRONMENT`), `sandbox` when unset.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Thresholds for the per-symbol scoring pipeline.
///
/// `Default` reproduces the production constants; tests build smaller
/// configurations to exercise edge cases on short synthetic series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Raw bars required before any feature is computed.
    pub min_history_bars: usize,
    /// Short moving average of close, in bars.
    pub short_ma: usize,
    /// Long moving average of close, in bars. Also sets the warm-up length.
    pub long_ma: usize,
    /// Moving average of volume, in bars.
    pub volume_ma: usize,
    /// Forward horizon of the label, in bars.
    pub horizon: usize,
    /// Forward return that counts as a meaningful move (0.02 = +2%).
    pub move_threshold: f64,
    /// Trailing rows considered per scoring pass.
    pub max_window_rows: usize,
    /// Trailing rows whose predictions are averaged into the score.
    pub prediction_rows: usize,
    /// Labeled rows the classifier needs before it is fitted.
    pub min_training_rows: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_history_bars: 100,
            short_ma: 5,
            long_ma: 20,
            volume_ma: 10,
            horizon: 5,
            move_threshold: 0.02,
            max_window_rows: 200,
            prediction_rows: 50,
            min_training_rows: 20,
        }
    }
}

impl ScoringConfig {
    /// Bars consumed before the first feature row exists.
    pub fn warmup_bars(&self) -> usize {
        self.short_ma.max(self.long_ma).max(self.volume_ma).max(2) - 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_ma == 0 || self.long_ma == 0 || self.volume_ma == 0 {
            return Err(ConfigError::Invalid(
                "moving average periods must be positive".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(ConfigError::Invalid("label horizon must be positive".to_string()));
        }
        if self.min_history_bars <= self.warmup_bars() + self.horizon {
            return Err(ConfigError::Invalid(format!(
                "{} bars of history leave no labeled rows after {} warm-up bars and a {}-bar horizon",
                self.min_history_bars,
                self.warmup_bars(),
                self.horizon
            )));
        }
        if !self.move_threshold.is_finite() || self.move_threshold <= -1.0 {
            return Err(ConfigError::Invalid(format!(
                "move threshold {} is not a usable return",
                self.move_threshold
            )));
        }
        if self.prediction_rows == 0 || self.min_training_rows == 0 {
            return Err(ConfigError::Invalid(
                "prediction and training windows must be non-empty".to_string(),
            ));
        }
        if self.max_window_rows < self.prediction_rows + self.min_training_rows {
            return Err(ConfigError::Invalid(format!(
                "window of {} rows cannot hold {} prediction rows and {} training rows",
                self.max_window_rows, self.prediction_rows, self.min_training_rows
            )));
        }
        Ok(())
    }
}

/// Everything the API server and the one-shot ranking binary need.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub universe: Vec<String>,
    pub default_count: usize,
    pub max_concurrency: usize,
    pub request_timeout: Option<Duration>,
    pub history: HistoryRequest,
    pub yahoo_base_url: String,
    pub scoring: ScoringConfig,
    pub forest: ForestConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            universe: DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect(),
            default_count: DEFAULT_PICK_COUNT,
            max_concurrency: default_concurrency(),
            request_timeout: Some(Duration::from_secs(60)),
            history: HistoryRequest::default(),
            yahoo_base_url: DEFAULT_BASE_URL.to_string(),
            scoring: ScoringConfig::default(),
            forest: ForestConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let universe = env::var("SYMBOLS")
            .ok()
            .map(|s| parse_symbols(&s))
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.universe);

        let request_timeout = match parse_env::<u64>("REQUEST_TIMEOUT_SECONDS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.request_timeout,
        };

        let mut forest = defaults.forest;
        if let Some(n_trees) = parse_env::<usize>("FOREST_TREES")? {
            forest.n_trees = n_trees;
        }
        if let Some(seed) = parse_env::<u64>("FOREST_SEED")? {
            forest.seed = seed;
        }

        let config = Self {
            port: parse_env("PORT")?.unwrap_or(defaults.port),
            universe,
            default_count: parse_env("DEFAULT_COUNT")?.unwrap_or(defaults.default_count),
            max_concurrency: parse_env("WORKER_CONCURRENCY")?.unwrap_or(defaults.max_concurrency),
            request_timeout,
            history: HistoryRequest {
                range: env::var("HISTORY_RANGE").unwrap_or(defaults.history.range),
                interval: env::var("HISTORY_INTERVAL").unwrap_or(defaults.history.interval),
            },
            yahoo_base_url: env::var("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            scoring: defaults.scoring,
            forest,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.is_empty() {
            return Err(ConfigError::Invalid("symbol universe is empty".to_string()));
        }
        if self.default_count == 0 {
            return Err(ConfigError::Invalid("DEFAULT_COUNT must be positive".to_string()));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "WORKER_CONCURRENCY must be positive".to_string(),
            ));
        }
        if self.forest.n_trees == 0 {
            return Err(ConfigError::Invalid("FOREST_TREES must be positive".to_string()));
        }
        self.scoring.validate()
    }
}

/// Split a comma separated symbol list, dropping blanks and duplicates.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_uppercase()) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
