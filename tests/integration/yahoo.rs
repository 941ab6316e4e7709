//! Integration tests for the Yahoo chart source against a mocked endpoint


use std::sync::Arc;
use toppicks::classifier::{ForestConfig, RandomForestFactory};
use toppicks::config::ScoringConfig;
use toppicks::error::SourceError;
use toppicks::scoring::{RankingService, SymbolScorer};
use toppicks::services::{HistoryRequest, TimeSeriesSource, YahooChartSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_utils::{chart_body, mock_chart, not_found_body};

async fn source(server: &MockServer) -> YahooChartSource {
    YahooChartSource::new(server.uri()).expect("build client")
}

#[tokio::test]
async fn fetches_daily_bars() {
    let server = MockServer::start().await;
    mock_chart(&server, "AAPL", ResponseTemplate::new(200).set_body_json(chart_body("AAPL", 30, 150.0))).await;

    let bars = source(&server)
        .await
        .fetch_history("AAPL", &HistoryRequest::default())
        .await
        .expect("history");

    assert_eq!(bars.len(), 30);
    assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(bars[0].date.to_string(), "2023-01-02");
}

#[tokio::test]
async fn symbol_is_encoded_as_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/BRK%2FB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body("BRK/B", 5, 300.0)))
        .expect(1)
        .mount(&server)
        .await;

    let bars = source(&server)
        .await
        .fetch_history("BRK/B", &HistoryRequest::default())
        .await
        .expect("history");
    assert_eq!(bars.len(), 5);
}

#[tokio::test]
async fn error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    mock_chart(&server, "GONE", ResponseTemplate::new(404).set_body_json(not_found_body())).await;

    let result = source(&server)
        .await
        .fetch_history("GONE", &HistoryRequest::default())
        .await;
    match result {
        Err(SourceError::Api { symbol, message }) => {
            assert_eq!(symbol, "GONE");
            assert!(message.contains("Not Found"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_becomes_status_error() {
    let server = MockServer::start().await;
    mock_chart(&server, "AAPL", ResponseTemplate::new(503).set_body_string("unavailable")).await;

    let result = source(&server)
        .await
        .fetch_history("AAPL", &HistoryRequest::default())
        .await;
    assert!(matches!(result, Err(SourceError::Status { status: 503, .. })));
}

#[tokio::test]
async fn garbage_body_is_a_decode_error() {
    let server = MockServer::start().await;
    mock_chart(&server, "AAPL", ResponseTemplate::new(200).set_body_string("<html>")).await;

    let result = source(&server)
        .await
        .fetch_history("AAPL", &HistoryRequest::default())
        .await;
    assert!(matches!(result, Err(SourceError::Decode(_))));
}

#[tokio::test]
async fn empty_result_is_unavailable() {
    let server = MockServer::start().await;
    let body = serde_json::json!({ "chart": { "result": [], "error": null } });
    mock_chart(&server, "AAPL", ResponseTemplate::new(200).set_body_json(body)).await;

    let result = source(&server)
        .await
        .fetch_history("AAPL", &HistoryRequest::default())
        .await;
    assert!(matches!(result, Err(SourceError::Unavailable(_))));
}

#[tokio::test]
async fn ranks_mocked_universe_with_forest() {
    let server = MockServer::start().await;
    mock_chart(&server, "AAPL", ResponseTemplate::new(200).set_body_json(chart_body("AAPL", 300, 150.0))).await;
    mock_chart(&server, "NEW", ResponseTemplate::new(200).set_body_json(chart_body("NEW", 40, 20.0))).await;
    mock_chart(&server, "GONE", ResponseTemplate::new(404).set_body_json(not_found_body())).await;

    let forest = RandomForestFactory::new(ForestConfig {
        n_trees: 10,
        ..ForestConfig::default()
    });
    let scorer = SymbolScorer::new(
        Arc::new(source(&server).await),
        Arc::new(forest),
        ScoringConfig::default(),
    );
    let universe = vec!["AAPL".to_string(), "NEW".to_string(), "GONE".to_string()];
    let ranking = RankingService::new(scorer, universe);

    let result = ranking.rank(5).await.expect("valid count");
    assert_eq!(result.symbols(), vec!["AAPL"]);
    assert!((0.0..=1.0).contains(&result.picks[0].score));
}
