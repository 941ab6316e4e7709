//! Walk-forward split of labeled rows into training and prediction windows.

use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::features::{FeatureVector, LabeledRow};

/// Two adjacent, non-overlapping slices of one symbol's rows.
/// Every training row precedes every prediction row.
#[derive(Debug, Clone, Copy)]
pub struct WindowSplit<'a> {
    pub training: &'a [LabeledRow],
    pub prediction: &'a [LabeledRow],
}

impl<'a> WindowSplit<'a> {
    /// Training features and labels in the shape the classifier consumes.
    pub fn training_set(&self) -> (Vec<FeatureVector>, Vec<bool>) {
        self.training
            .iter()
            .map(|row| (row.features.to_vector(), row.label))
            .unzip()
    }

    pub fn prediction_features(&self) -> Vec<FeatureVector> {
        self.prediction.iter().map(|row| row.features.to_vector()).collect()
    }
}

pub struct WindowSplitter;

impl WindowSplitter {
    /// Keep the trailing `max_window_rows` rows, predict on the last
    /// `prediction_rows` of them and train on the rest.
    pub fn split<'a>(rows: &'a [LabeledRow], config: &ScoringConfig) -> Result<WindowSplit<'a>, ScoringError> {
        let n = config.max_window_rows.min(rows.len());
        let trailing = &rows[rows.len() - n..];

        let prediction_len = config.prediction_rows.min(n);
        let (training, prediction) = trailing.split_at(n - prediction_len);

        if training.len() < config.min_training_rows {
            return Err(ScoringError::InsufficientWindow {
                required: config.min_training_rows,
                provided: training.len(),
            });
        }

        Ok(WindowSplit { training, prediction })
    }
}
