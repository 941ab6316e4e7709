//! Random Forest classifier

use super::tree::{DecisionTree, TreeConfig};
use super::ProbabilisticClassifier;
use crate::cancel::CancelFlag;
use crate::error::ClassifierError;
use crate::features::{FeatureVector, FEATURE_COUNT};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Random Forest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree (None = unlimited)
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features per split (floor of sqrt of total if None)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Random seed; tree `i` uses `seed + i`
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 50,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Bagged decision trees; the probability is the mean of the trees' leaf
/// positive-class frequencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn max_features(&self) -> usize {
        self.config
            .max_features
            .unwrap_or_else(|| (FEATURE_COUNT as f64).sqrt().floor() as usize)
            .clamp(1, FEATURE_COUNT)
    }
}

impl ProbabilisticClassifier for RandomForest {
    fn fit(&mut self, features: &[FeatureVector], labels: &[bool]) -> Result<(), ClassifierError> {
        self.fit_until(features, labels, &CancelFlag::new())
    }

    /// Checks `cancel` before each tree; a cancelled fit leaves the forest
    /// unfitted.
    fn fit_until(
        &mut self,
        features: &[FeatureVector],
        labels: &[bool],
        cancel: &CancelFlag,
    ) -> Result<(), ClassifierError> {
        if features.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if features.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        if features.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFiniteFeature);
        }

        let n = features.len();
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(self.max_features()),
        };

        self.trees.clear();
        let mut trees = Vec::with_capacity(self.config.n_trees);
        for i in 0..self.config.n_trees {
            if cancel.is_cancelled() {
                return Err(ClassifierError::Cancelled);
            }

            let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(i as u64));
            let sample: Vec<usize> = if self.config.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };

            let mut tree = DecisionTree::new(tree_config.clone());
            tree.fit(features, labels, &sample, &mut rng);
            trees.push(tree);
        }

        self.trees = trees;
        Ok(())
    }

    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let total: f64 = self.trees.iter().map(|t| t.predict_probability(features)).sum();
        total / self.trees.len() as f64
    }
}
