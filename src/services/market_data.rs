//! Time-series source interface and an in-memory implementation.

use crate::error::SourceError;
use crate::models::bar::RawBar;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Lookback and bar size requested from a source, in the provider's
/// vocabulary (`"2y"`, `"1d"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub range: String,
    pub interval: String,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self {
            range: "2y".to_string(),
            interval: "1d".to_string(),
        }
    }
}

#[async_trait]
pub trait TimeSeriesSource: Send + Sync {
    /// Bars for `symbol`, ascending by date.
    async fn fetch_history(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Vec<RawBar>, SourceError>;
}

/// Frozen histories keyed by symbol.
///
/// Unknown symbols fail with `SourceError::UnknownSymbol`. Failures and
/// per-symbol latency can be injected to rehearse partial outages.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    histories: HashMap<String, Result<Vec<RawBar>, SourceError>>,
    delays: HashMap<String, Duration>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, symbol: impl Into<String>, bars: Vec<RawBar>) -> Self {
        self.histories.insert(symbol.into(), Ok(bars));
        self
    }

    pub fn with_failure(mut self, symbol: impl Into<String>, error: SourceError) -> Self {
        self.histories.insert(symbol.into(), Err(error));
        self
    }

    pub fn with_delay(mut self, symbol: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(symbol.into(), delay);
        self
    }
}

#[async_trait]
impl TimeSeriesSource for InMemorySource {
    async fn fetch_history(
        &self,
        symbol: &str,
        _request: &HistoryRequest,
    ) -> Result<Vec<RawBar>, SourceError> {
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
        match self.histories.get(symbol) {
            Some(result) => result.clone(),
            None => Err(SourceError::UnknownSymbol(symbol.to_string())),
        }
    }
}
