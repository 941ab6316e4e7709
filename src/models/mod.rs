//! Shared data models spanning the pipeline layers.

pub mod bar;
pub mod score;

pub use bar::RawBar;
pub use score::{Pick, RankingResult, ScoreOutcome, SymbolScore};
