//! Feature engineering: raw bars to labeled feature rows.

pub mod builder;
pub mod rolling;

pub use builder::{FeatureBuilder, FeatureRow, FeatureVector, LabeledRow, FEATURE_COUNT, FEATURE_NAMES};
