//! Unit tests for per-symbol scoring

use crate::support::{
    assert_close, flat_bars, sine_bars, BrokenFactory, MeanLevelFactory,
};
use std::sync::Arc;
use toppicks::classifier::{ForestConfig, RandomForestFactory};
use toppicks::config::ScoringConfig;
use toppicks::error::{ScoringError, SourceError};
use toppicks::cancel::CancelFlag;
use toppicks::scoring::{score_history, score_history_until, SymbolScorer};
use toppicks::services::InMemorySource;

fn forest() -> RandomForestFactory {
    RandomForestFactory::new(ForestConfig {
        n_trees: 15,
        ..ForestConfig::default()
    })
}

fn scorer(source: InMemorySource) -> SymbolScorer {
    SymbolScorer::new(
        Arc::new(source),
        Arc::new(forest()),
        ScoringConfig::default(),
    )
}

#[test]
fn test_score_is_mean_of_prediction_window() {
    let score = score_history(&sine_bars(300, 71.0), &MeanLevelFactory, &ScoringConfig::default()).unwrap();
    assert_close(score, 0.71);
}

#[test]
fn test_forest_score_is_a_probability() {
    let score = score_history(&sine_bars(300, 40.0), &forest(), &ScoringConfig::default()).unwrap();
    assert!((0.0..=1.0).contains(&score));
}

#[test]
fn test_frozen_history_scores_identically() {
    let history = sine_bars(420, 123.0);
    let config = ScoringConfig::default();
    let first = score_history(&history, &forest(), &config).unwrap();
    let second = score_history(&history, &forest(), &config).unwrap();
    assert_close(first, second);
}

#[test]
fn test_single_class_training_is_degenerate() {
    let result = score_history(&flat_bars(300, 20.0), &forest(), &ScoringConfig::default());
    assert!(matches!(result, Err(ScoringError::DegenerateLabels)));
}

#[test]
fn test_classifier_failure_is_reported() {
    let result = score_history(&sine_bars(300, 20.0), &BrokenFactory, &ScoringConfig::default());
    assert!(matches!(result, Err(ScoringError::Classifier(_))));
}

#[test]
fn test_scores_are_clamped() {
    // ma_long of 250 would predict 2.5.
    let score = score_history(&sine_bars(300, 250.0), &MeanLevelFactory, &ScoringConfig::default()).unwrap();
    assert_eq!(score, 1.0);
}

#[test]
fn test_cancelled_scoring_stops() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let result = score_history_until(&sine_bars(300, 40.0), &forest(), &ScoringConfig::default(), &cancel);
    assert!(matches!(result, Err(ScoringError::Cancelled)));
}

#[tokio::test]
async fn test_retrieval_failure_is_unscoreable() {
    let source = InMemorySource::new().with_failure("C", SourceError::Http("connection reset".to_string()));
    let score = scorer(source).score("C").await;

    assert_eq!(score.symbol, "C");
    assert!(score.score().is_none());
    assert!(matches!(score.reason(), Some(ScoringError::DataRetrieval(_))));
}

#[tokio::test]
async fn test_unknown_symbol_is_unscoreable() {
    let score = scorer(InMemorySource::new()).score("ZZZ").await;
    assert!(matches!(
        score.reason(),
        Some(ScoringError::DataRetrieval(SourceError::UnknownSymbol(_)))
    ));
}

#[tokio::test]
async fn test_empty_history_is_unscoreable() {
    let score = scorer(InMemorySource::new().with_history("E", Vec::new())).score("E").await;
    assert!(matches!(score.reason(), Some(ScoringError::EmptyHistory)));
}

#[tokio::test]
async fn test_short_history_is_unscoreable() {
    let score = scorer(InMemorySource::new().with_history("B", sine_bars(50, 10.0)))
        .score("B")
        .await;
    assert!(matches!(
        score.reason(),
        Some(ScoringError::InsufficientHistory { provided: 50, .. })
    ));
}

#[tokio::test]
async fn test_small_training_window_is_unscoreable() {
    let config = ScoringConfig {
        min_history_bars: 30,
        ..ScoringConfig::default()
    };
    let source = InMemorySource::new().with_history("W", sine_bars(60, 10.0));
    let scorer = SymbolScorer::new(Arc::new(source), Arc::new(forest()), config);

    let score = scorer.score("W").await;
    assert!(matches!(score.reason(), Some(ScoringError::InsufficientWindow { .. })));
}

#[tokio::test]
async fn test_well_formed_history_is_scored() {
    let score = scorer(InMemorySource::new().with_history("A", sine_bars(300, 90.0)))
        .score("A")
        .await;
    let value = score.score().expect("A should be scoreable");
    assert!((0.0..=1.0).contains(&value));
}
