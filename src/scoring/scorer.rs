//! Per-symbol scoring: history → features → walk-forward windows → classifier.

use super::window::WindowSplitter;
use crate::cancel::CancelFlag;
use crate::classifier::ClassifierFactory;
use crate::config::ScoringConfig;
use crate::error::{ClassifierError, ScoringError};
use crate::features::FeatureBuilder;
use crate::models::bar::RawBar;
use crate::models::score::SymbolScore;
use crate::services::market_data::{HistoryRequest, TimeSeriesSource};
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{debug, warn};

/// Score one frozen history: the mean predicted probability of an upward
/// move over the prediction window, from a classifier freshly fitted on the
/// preceding training window.
pub fn score_history(
    history: &[RawBar],
    classifier: &dyn ClassifierFactory,
    config: &ScoringConfig,
) -> Result<f64, ScoringError> {
    score_history_until(history, classifier, config, &CancelFlag::new())
}

/// `score_history` that gives up with `ScoringError::Cancelled` once `cancel`
/// is set. The flag is checked between stages and handed to the classifier.
pub fn score_history_until(
    history: &[RawBar],
    classifier: &dyn ClassifierFactory,
    config: &ScoringConfig,
    cancel: &CancelFlag,
) -> Result<f64, ScoringError> {
    let rows = FeatureBuilder::build(history, config)?;
    let window = WindowSplitter::split(&rows, config)?;

    let (features, labels) = window.training_set();
    if labels.iter().all(|&l| l) || labels.iter().all(|&l| !l) {
        return Err(ScoringError::DegenerateLabels);
    }
    if cancel.is_cancelled() {
        return Err(ScoringError::Cancelled);
    }

    let mut model = classifier.create();
    model
        .fit_until(&features, &labels, cancel)
        .map_err(|e| match e {
            ClassifierError::Cancelled => ScoringError::Cancelled,
            other => ScoringError::Classifier(other),
        })?;
    if cancel.is_cancelled() {
        return Err(ScoringError::Cancelled);
    }

    let probabilities: Vec<f64> = window
        .prediction_features()
        .iter()
        .map(|row| model.predict_probability(row))
        .collect();
    if probabilities.is_empty() {
        return Err(ScoringError::InsufficientWindow {
            required: 1,
            provided: 0,
        });
    }

    let mean = probabilities.iter().sum::<f64>() / probabilities.len() as f64;
    if !mean.is_finite() {
        return Err(ClassifierError::NonFiniteProbability.into());
    }
    Ok(mean.clamp(0.0, 1.0))
}

/// Fetches a symbol's history and scores it, turning every failure into an
/// unscoreable result.
pub struct SymbolScorer {
    source: Arc<dyn TimeSeriesSource>,
    classifier: Arc<dyn ClassifierFactory>,
    config: Arc<ScoringConfig>,
    history: HistoryRequest,
}

impl SymbolScorer {
    pub fn new(
        source: Arc<dyn TimeSeriesSource>,
        classifier: Arc<dyn ClassifierFactory>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            source,
            classifier,
            config: Arc::new(config),
            history: HistoryRequest::default(),
        }
    }

    pub fn with_history_request(mut self, history: HistoryRequest) -> Self {
        self.history = history;
        self
    }

    pub async fn score(&self, symbol: &str) -> SymbolScore {
        self.score_with(symbol, &CancelFlag::new(), None).await
    }

    /// Score under a cancel flag. `permit` moves into the CPU-bound stage and
    /// is released only when that stage ends, even if this future is dropped
    /// first.
    pub async fn score_with(
        &self,
        symbol: &str,
        cancel: &CancelFlag,
        permit: Option<OwnedSemaphorePermit>,
    ) -> SymbolScore {
        match self.try_score(symbol, cancel, permit).await {
            Ok(score) => {
                debug!(symbol = %symbol, score = score, "Scored {}: {:.4}", symbol, score);
                SymbolScore::scored(symbol, score)
            }
            Err(e) => {
                match e {
                    ScoringError::DataRetrieval(_)
                    | ScoringError::Classifier(_)
                    | ScoringError::Internal(_) => {
                        warn!(symbol = %symbol, reason = e.kind(), error = %e, "Score error for {}", symbol);
                    }
                    _ => {
                        debug!(symbol = %symbol, reason = e.kind(), error = %e, "{} is unscoreable", symbol);
                    }
                }
                SymbolScore::unscoreable(symbol, e)
            }
        }
    }

    async fn try_score(
        &self,
        symbol: &str,
        cancel: &CancelFlag,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Result<f64, ScoringError> {
        let history = self.source.fetch_history(symbol, &self.history).await?;
        if history.is_empty() {
            return Err(ScoringError::EmptyHistory);
        }
        if cancel.is_cancelled() {
            return Err(ScoringError::Cancelled);
        }

        debug!(
            symbol = %symbol,
            bars = history.len(),
            classifier = self.classifier.name(),
            "Fetched {} bars for {}",
            history.len(),
            symbol
        );

        // Feature building and fitting are CPU-bound; keep them off the async workers.
        let classifier = self.classifier.clone();
        let config = self.config.clone();
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            score_history_until(&history, classifier.as_ref(), &config, &cancel)
        })
        .await
        .map_err(|e| ScoringError::Internal(format!("scoring task failed: {}", e)))?
    }
}
