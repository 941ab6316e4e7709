//! One-shot ranking: score the configured universe once and print the picks.
//!
//! Usage: `toppicks [count]`

use dotenvy::dotenv;
use std::sync::Arc;
use toppicks::classifier::RandomForestFactory;
use toppicks::config::ServiceConfig;
use toppicks::logging;
use toppicks::models::score::ScoreOutcome;
use toppicks::scoring::{parse_count, select_top, RankingService};
use toppicks::services::YahooChartSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = ServiceConfig::from_env()?;
    let arg = std::env::args().nth(1);
    let count = parse_count(arg.as_deref(), config.default_count)?;

    let source = Arc::new(YahooChartSource::new(config.yahoo_base_url.clone())?);
    let classifier = Arc::new(RandomForestFactory::new(config.forest.clone()));
    let service = RankingService::from_config(&config, source, classifier);

    let scores = service.score_universe(service.universe()).await;
    let result = select_top(&scores, count);

    println!("Top {} of {} symbols:", result.len(), scores.len());
    for (i, pick) in result.picks.iter().enumerate() {
        println!("  {}. {:<6} {:.4}", i + 1, pick.symbol, pick.score);
    }

    let skipped: Vec<_> = scores
        .iter()
        .filter_map(|s| match &s.outcome {
            ScoreOutcome::Unscoreable(reason) => Some((s.symbol.as_str(), reason)),
            ScoreOutcome::Scored(_) => None,
        })
        .collect();
    if !skipped.is_empty() {
        println!("Unscoreable:");
        for (symbol, reason) in skipped {
            println!("  {:<6} {}", symbol, reason);
        }
    }

    Ok(())
}
