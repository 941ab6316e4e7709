//! Feature rows and forward-looking labels built from daily bars.

use super::rolling::{pct_change, rolling_mean};
use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::models::bar::RawBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 4;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["one_day_return", "ma_short", "ma_long", "volume_ma"];

/// Classifier input, ordered as `FEATURE_NAMES`.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Features for one day, computed from that day and earlier bars only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub one_day_return: f64,
    /// Short moving average of close (5 bars by default).
    pub ma_short: f64,
    /// Long moving average of close (20 bars by default).
    pub ma_long: f64,
    /// Moving average of volume (10 bars by default).
    pub volume_ma: f64,
}

impl FeatureRow {
    pub fn to_vector(&self) -> FeatureVector {
        [self.one_day_return, self.ma_short, self.ma_long, self.volume_ma]
    }

    fn is_finite(&self) -> bool {
        self.to_vector().iter().all(|v| v.is_finite())
    }
}

/// A feature row paired with its label: did close rise by more than the
/// threshold over the label horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub features: FeatureRow,
    pub label: bool,
}

pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Turn an ascending daily history into labeled rows.
    ///
    /// Rows without every feature defined (the warm-up at the start of the
    /// series) and rows without a full forward horizon (the last
    /// `config.horizon` bars) are dropped. Output stays in date order.
    pub fn build(history: &[RawBar], config: &ScoringConfig) -> Result<Vec<LabeledRow>, ScoringError> {
        if history.len() < config.min_history_bars {
            return Err(ScoringError::InsufficientHistory {
                required: config.min_history_bars,
                provided: history.len(),
            });
        }
        validate_history(history)?;

        let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = history.iter().map(|b| b.volume).collect();

        let returns = pct_change(&closes);
        let ma_short = rolling_mean(&closes, config.short_ma);
        let ma_long = rolling_mean(&closes, config.long_ma);
        let volume_ma = rolling_mean(&volumes, config.volume_ma);

        let labeled_end = history.len().saturating_sub(config.horizon);
        let mut rows = Vec::with_capacity(labeled_end.saturating_sub(config.warmup_bars()));

        for t in 0..labeled_end {
            let (Some(one_day_return), Some(ma_short), Some(ma_long), Some(volume_ma)) =
                (returns[t], ma_short[t], ma_long[t], volume_ma[t])
            else {
                continue;
            };

            let features = FeatureRow {
                date: history[t].date,
                one_day_return,
                ma_short,
                ma_long,
                volume_ma,
            };
            if !features.is_finite() {
                continue;
            }

            let forward_return = closes[t + config.horizon] / closes[t] - 1.0;
            rows.push(LabeledRow {
                features,
                label: forward_return > config.move_threshold,
            });
        }

        Ok(rows)
    }
}

fn validate_history(history: &[RawBar]) -> Result<(), ScoringError> {
    for pair in history.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(ScoringError::MalformedHistory(format!(
                "bar dated {} follows {}",
                pair[1].date, pair[0].date
            )));
        }
    }

    if let Some(bar) = history
        .iter()
        .find(|b| !b.close.is_finite() || b.close <= 0.0 || !b.volume.is_finite() || b.volume < 0.0)
    {
        return Err(ScoringError::MalformedHistory(format!(
            "bar dated {} has close {} and volume {}",
            bar.date, bar.close, bar.volume
        )));
    }

    Ok(())
}
