use crate::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Result of scoring one symbol.
#[derive(Debug, Clone)]
pub enum ScoreOutcome {
    /// Mean predicted probability of an upward move, in `[0, 1]`.
    Scored(f64),
    Unscoreable(ScoringError),
}

#[derive(Debug, Clone)]
pub struct SymbolScore {
    pub symbol: String,
    pub outcome: ScoreOutcome,
}

impl SymbolScore {
    pub fn scored(symbol: impl Into<String>, score: f64) -> Self {
        Self {
            symbol: symbol.into(),
            outcome: ScoreOutcome::Scored(score),
        }
    }

    pub fn unscoreable(symbol: impl Into<String>, reason: ScoringError) -> Self {
        Self {
            symbol: symbol.into(),
            outcome: ScoreOutcome::Unscoreable(reason),
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self.outcome {
            ScoreOutcome::Scored(score) => Some(score),
            ScoreOutcome::Unscoreable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&ScoringError> {
        match &self.outcome {
            ScoreOutcome::Scored(_) => None,
            ScoreOutcome::Unscoreable(reason) => Some(reason),
        }
    }
}

/// A ranked, scored symbol as served to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub symbol: String,
    pub score: f64,
}

/// Picks in descending score order. Order among equal scores is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub picks: Vec<Pick>,
}

impl RankingResult {
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.picks.iter().map(|p| p.symbol.as_str()).collect()
    }
}
