//! Pluggable binary classifier capability.
//!
//! The scorer only needs `fit` and `predict_probability`; any probabilistic
//! binary classifier can stand in for the bundled random forest.

pub mod forest;
pub mod tree;

pub use forest::{ForestConfig, RandomForest};
pub use tree::{DecisionTree, TreeConfig};

use crate::cancel::CancelFlag;
use crate::error::ClassifierError;
use crate::features::FeatureVector;

pub trait ProbabilisticClassifier: Send {
    /// Train from scratch on `features` with boolean `labels`.
    fn fit(&mut self, features: &[FeatureVector], labels: &[bool]) -> Result<(), ClassifierError>;

    /// `fit` that stops early with `ClassifierError::Cancelled` once `cancel`
    /// is set. Implementations that cannot be interrupted only check before
    /// starting.
    fn fit_until(
        &mut self,
        features: &[FeatureVector],
        labels: &[bool],
        cancel: &CancelFlag,
    ) -> Result<(), ClassifierError> {
        if cancel.is_cancelled() {
            return Err(ClassifierError::Cancelled);
        }
        self.fit(features, labels)
    }

    /// Probability of the positive class, in `[0, 1]`.
    fn predict_probability(&self, features: &FeatureVector) -> f64;
}

/// Produces untrained classifiers. Each symbol gets its own instance, so no
/// fitted state is ever shared between symbols.
pub trait ClassifierFactory: Send + Sync {
    fn create(&self) -> Box<dyn ProbabilisticClassifier>;

    fn name(&self) -> &str;
}

/// Factory for seeded random forests.
#[derive(Debug, Clone, Default)]
pub struct RandomForestFactory {
    config: ForestConfig,
}

impl RandomForestFactory {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }
}

impl ClassifierFactory for RandomForestFactory {
    fn create(&self) -> Box<dyn ProbabilisticClassifier> {
        Box::new(RandomForest::new(self.config.clone()))
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}
