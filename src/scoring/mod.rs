//! Scoring pipeline and ranking.

pub mod ranking;
pub mod scorer;
pub mod window;

pub use ranking::{parse_count, select_top, validate_count, RankingService};
pub use scorer::{score_history, score_history_until, SymbolScorer};
pub use window::{WindowSplit, WindowSplitter};
