//! Binary Gini decision tree, the building block of the random forest.

use crate::features::{FeatureVector, FEATURE_COUNT};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth (None = grow until pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        positive_rate: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<Node>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    /// Grow the tree on the rows of `features`/`labels` selected by `sample`.
    /// `sample` may repeat indices (bootstrap draws).
    pub fn fit(
        &mut self,
        features: &[FeatureVector],
        labels: &[bool],
        sample: &[usize],
        rng: &mut ChaCha8Rng,
    ) {
        self.root = Some(self.grow(features, labels, sample, 0, rng));
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Positive-class frequency of the leaf `features` falls into.
    pub fn predict_probability(&self, features: &FeatureVector) -> f64 {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0.5,
        };
        loop {
            match node {
                Node::Leaf { positive_rate } => return *positive_rate,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn depth_of(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
            }
        }
        self.root.as_ref().map(depth_of).unwrap_or(0)
    }

    fn grow(
        &self,
        features: &[FeatureVector],
        labels: &[bool],
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> Node {
        let n = indices.len();
        let positives = indices.iter().filter(|&&i| labels[i]).count();
        let leaf = Node::Leaf {
            positive_rate: if n == 0 { 0.5 } else { positives as f64 / n as f64 },
        };

        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_reached || n < self.config.min_samples_split || positives == 0 || positives == n {
            return leaf;
        }

        let Some(split) = self.best_split(features, labels, indices, positives, rng) else {
            return leaf;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| features[i][split.feature] <= split.threshold);

        if left_idx.is_empty() || right_idx.is_empty() {
            return leaf;
        }

        let left = self.grow(features, labels, &left_idx, depth + 1, rng);
        let right = self.grow(features, labels, &right_idx, depth + 1, rng);

        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Sweep sorted values of a random feature subset for the largest Gini gain.
    fn best_split(
        &self,
        features: &[FeatureVector],
        labels: &[bool],
        indices: &[usize],
        positives: usize,
        rng: &mut ChaCha8Rng,
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let parent_impurity = gini(positives, n);
        let max_features = self.config.max_features.unwrap_or(FEATURE_COUNT).clamp(1, FEATURE_COUNT);

        let mut candidates: Vec<usize> = (0..FEATURE_COUNT).collect();
        candidates.shuffle(rng);
        candidates.truncate(max_features);

        let mut best: Option<SplitCandidate> = None;
        let mut order = indices.to_vec();

        for &feature in &candidates {
            order.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

            let mut left_positives = 0;
            for i in 0..n - 1 {
                if labels[order[i]] {
                    left_positives += 1;
                }
                let value = features[order[i]][feature];
                let next = features[order[i + 1]][feature];
                if value == next {
                    continue;
                }

                let left_n = i + 1;
                let right_n = n - left_n;
                if left_n < self.config.min_samples_leaf || right_n < self.config.min_samples_leaf {
                    continue;
                }

                let weighted = (left_n as f64 * gini(left_positives, left_n)
                    + right_n as f64 * gini(positives - left_positives, right_n))
                    / n as f64;
                let gain = parent_impurity - weighted;

                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    let midpoint = value + (next - value) / 2.0;
                    // Adjacent floats can round the midpoint up onto `next`.
                    let threshold = if midpoint < next { midpoint } else { value };
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}

fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}
