//! Unit tests for the walk-forward window splitter

use crate::support::labeled_rows;
use toppicks::config::ScoringConfig;
use toppicks::error::ScoringError;
use toppicks::scoring::WindowSplitter;

#[test]
fn test_split_uses_trailing_rows() {
    let rows = labeled_rows(276);
    let split = WindowSplitter::split(&rows, &ScoringConfig::default()).unwrap();

    assert_eq!(split.training.len(), 150);
    assert_eq!(split.prediction.len(), 50);
    assert_eq!(split.training.first().unwrap(), &rows[76]);
    assert_eq!(split.prediction.last().unwrap(), rows.last().unwrap());
}

#[test]
fn test_short_sequence_uses_everything() {
    let rows = labeled_rows(120);
    let split = WindowSplitter::split(&rows, &ScoringConfig::default()).unwrap();

    assert_eq!(split.training.len(), 70);
    assert_eq!(split.prediction.len(), 50);
    assert_eq!(split.training.first().unwrap(), &rows[0]);
}

#[test]
fn test_minimum_training_rows() {
    let config = ScoringConfig::default();
    assert!(WindowSplitter::split(&labeled_rows(70), &config).is_ok());

    match WindowSplitter::split(&labeled_rows(69), &config) {
        Err(ScoringError::InsufficientWindow { required, provided }) => {
            assert_eq!(required, 20);
            assert_eq!(provided, 19);
        }
        other => panic!("expected insufficient window, got {other:?}"),
    }
}

#[test]
fn test_fewer_rows_than_prediction_window() {
    let rows = labeled_rows(30);
    let result = WindowSplitter::split(&rows, &ScoringConfig::default());
    assert!(matches!(
        result,
        Err(ScoringError::InsufficientWindow { provided: 0, .. })
    ));
    assert!(WindowSplitter::split(&[], &ScoringConfig::default()).is_err());
}

#[test]
fn test_windows_never_overlap() {
    let config = ScoringConfig::default();
    for len in 70..=400 {
        let rows = labeled_rows(len);
        let split = WindowSplitter::split(&rows, &config).unwrap();

        assert_eq!(split.training.len() + split.prediction.len(), len.min(200));
        let last_training = split.training.last().unwrap().features.date;
        let first_prediction = split.prediction.first().unwrap().features.date;
        assert!(last_training < first_prediction, "overlap at length {len}");
    }
}

#[test]
fn test_training_set_shape() {
    let rows = labeled_rows(100);
    let split = WindowSplitter::split(&rows, &ScoringConfig::default()).unwrap();
    let (features, labels) = split.training_set();

    assert_eq!(features.len(), 50);
    assert_eq!(labels.len(), 50);
    assert_eq!(features[3], rows[3].features.to_vector());
    assert_eq!(labels[3], rows[3].label);
    assert_eq!(split.prediction_features().len(), 50);
}

#[test]
fn test_custom_window_sizes() {
    let config = ScoringConfig {
        max_window_rows: 30,
        prediction_rows: 10,
        min_training_rows: 5,
        ..ScoringConfig::default()
    };
    let rows = labeled_rows(100);
    let split = WindowSplitter::split(&rows, &config).unwrap();

    assert_eq!(split.training.len(), 20);
    assert_eq!(split.prediction.len(), 10);
    assert_eq!(split.training.first().unwrap(), &rows[70]);
}
