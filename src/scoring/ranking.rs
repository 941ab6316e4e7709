//! Universe-wide ranking: concurrent per-symbol scoring, then sort and truncate.

use super::scorer::SymbolScorer;
use crate::cancel::CancelFlag;
use crate::classifier::ClassifierFactory;
use crate::config::ServiceConfig;
use crate::error::{InvalidRequestError, ScoringError};
use crate::metrics::Metrics;
use crate::models::score::{Pick, RankingResult, ScoreOutcome, SymbolScore};
use crate::services::market_data::TimeSeriesSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info};

/// Check a requested pick count.
pub fn validate_count(count: i64) -> Result<usize, InvalidRequestError> {
    if count <= 0 {
        return Err(InvalidRequestError::NonPositiveCount(count));
    }
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}

/// Parse a count from a query parameter, `default` when absent.
///
/// Positive integers too large for `i64` saturate to `usize::MAX`: asking
/// for more picks than exist returns every scored symbol.
pub fn parse_count(raw: Option<&str>, default: usize) -> Result<usize, InvalidRequestError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => match value.parse::<i64>() {
            Ok(count) => validate_count(count),
            Err(_) if is_unsigned_integer(value.strip_prefix('+').unwrap_or(value)) => Ok(usize::MAX),
            Err(_) if value.strip_prefix('-').is_some_and(is_unsigned_integer) => {
                Err(InvalidRequestError::NonPositiveCount(i64::MIN))
            }
            Err(_) => Err(InvalidRequestError::MalformedCount(value.to_string())),
        },
    }
}

fn is_unsigned_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Keep scored symbols, highest score first, at most `count` of them.
///
/// The sort is stable, so equal scores keep universe order, but callers must
/// treat tie order as unspecified.
pub fn select_top(scores: &[SymbolScore], count: usize) -> RankingResult {
    let mut picks: Vec<Pick> = scores
        .iter()
        .filter_map(|s| {
            s.score().map(|score| Pick {
                symbol: s.symbol.clone(),
                score,
            })
        })
        .collect();

    picks.sort_by(|a, b| b.score.total_cmp(&a.score));
    picks.truncate(count);
    RankingResult { picks }
}

/// Scores a universe concurrently and keeps the best symbols.
///
/// The worker semaphore is shared by every ranking on this service, so
/// `max_concurrency` bounds CPU-bound scoring across concurrent requests.
/// A permit is held until the symbol's blocking work has actually finished.
pub struct RankingService {
    scorer: Arc<SymbolScorer>,
    universe: Vec<String>,
    workers: Arc<Semaphore>,
    timeout: Option<Duration>,
    metrics: Option<Arc<Metrics>>,
}

impl RankingService {
    pub fn new(scorer: SymbolScorer, universe: Vec<String>) -> Self {
        let max_concurrency = universe.len().max(1);
        Self {
            scorer: Arc::new(scorer),
            universe,
            workers: Arc::new(Semaphore::new(max_concurrency)),
            timeout: None,
            metrics: None,
        }
    }

    pub fn from_config(
        config: &ServiceConfig,
        source: Arc<dyn TimeSeriesSource>,
        classifier: Arc<dyn ClassifierFactory>,
    ) -> Self {
        let scorer = SymbolScorer::new(source, classifier, config.scoring.clone())
            .with_history_request(config.history.clone());
        Self::new(scorer, config.universe.clone())
            .with_concurrency(config.max_concurrency)
            .with_timeout(config.request_timeout)
    }

    /// Set custom concurrency (default is number of symbols)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.workers = Arc::new(Semaphore::new(concurrency.max(1)));
        self
    }

    /// Deadline for a whole ranking; symbols still running when it passes
    /// are unscoreable.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Rank the configured universe.
    pub async fn rank(&self, count: i64) -> Result<RankingResult, InvalidRequestError> {
        let count = validate_count(count)?;
        Ok(self.rank_top(count).await)
    }

    /// Rank the configured universe with a count already checked by
    /// `validate_count` or `parse_count`.
    pub async fn rank_top(&self, count: usize) -> RankingResult {
        self.rank_universe(&self.universe, count).await
    }

    pub async fn rank_universe(&self, universe: &[String], count: usize) -> RankingResult {
        let start = Instant::now();

        let scores = self.score_universe(universe).await;
        let result = select_top(&scores, count);

        let scored = scores.iter().filter(|s| s.score().is_some()).count();
        let duration = start.elapsed();
        if let Some(ref metrics) = self.metrics {
            metrics.rankings_total.inc();
            metrics.ranking_duration_seconds.observe(duration.as_secs_f64());
            for score in &scores {
                match &score.outcome {
                    ScoreOutcome::Scored(_) => metrics.symbols_scored_total.inc(),
                    ScoreOutcome::Unscoreable(reason) => metrics
                        .symbols_unscoreable_total
                        .with_label_values(&[reason.kind()])
                        .inc(),
                }
            }
        }

        info!(
            universe = universe.len(),
            scored = scored,
            unscoreable = universe.len() - scored,
            returned = result.len(),
            duration_ms = duration.as_millis() as u64,
            "Ranked {} of {} symbols",
            scored,
            universe.len()
        );

        result
    }

    /// Score every symbol concurrently. Output follows `universe` order.
    ///
    /// Symbols still running at the deadline, or when this future is
    /// dropped, are cancelled and their blocking work stops at its next
    /// checkpoint.
    pub async fn score_universe(&self, universe: &[String]) -> Vec<SymbolScore> {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let cancel = CancelFlag::new();
        let _cancel_on_drop = cancel.cancel_on_drop();
        let mut tasks = JoinSet::new();

        for (index, symbol) in universe.iter().cloned().enumerate() {
            let scorer = self.scorer.clone();
            let workers = self.workers.clone();
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let work = async {
                    let permit = workers
                        .acquire_owned()
                        .await
                        .map_err(|_| ScoringError::Cancelled)?;
                    Ok::<_, ScoringError>(scorer.score_with(&symbol, &cancel, Some(permit)).await)
                };

                let outcome = match deadline {
                    Some(deadline) => match tokio::time::timeout_at(deadline, work).await {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            cancel.cancel();
                            Err(ScoringError::Cancelled)
                        }
                    },
                    None => work.await,
                };

                let score = outcome.unwrap_or_else(|e| SymbolScore::unscoreable(symbol.clone(), e));
                (index, score)
            });
        }

        let mut slots: Vec<Option<SymbolScore>> = vec![None; universe.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, score)) => slots[index] = Some(score),
                Err(e) => error!(error = %e, "Scoring task panicked"),
            }
        }

        slots
            .into_iter()
            .zip(universe)
            .map(|(slot, symbol)| {
                slot.unwrap_or_else(|| {
                    SymbolScore::unscoreable(
                        symbol.clone(),
                        ScoringError::Internal("scoring task failed".to_string()),
                    )
                })
            })
            .collect()
    }
}
