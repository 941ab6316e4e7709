//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::classifier::{ClassifierFactory, RandomForestFactory};
use crate::config::ServiceConfig;
use crate::features::FEATURE_NAMES;
use crate::metrics::Metrics;
use crate::models::score::RankingResult;
use crate::scoring::{parse_count, RankingService};
use crate::services::yahoo::YahooChartSource;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub ranking: Arc<RankingService>,
    pub default_count: usize,
}

pub async fn root() -> &'static str {
    "predictor ok"
}

/// Ranking is stateless, so a responding process is a healthy one.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "service": "toppicks-predictor"
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
pub struct TopPicksQuery {
    n: Option<String>,
}

/// Top `n` symbols by predicted probability of an upward move
async fn top_picks(
    State(state): State<AppState>,
    Query(params): Query<TopPicksQuery>,
) -> Result<Json<RankingResult>, (StatusCode, Json<Value>)> {
    let count = parse_count(params.n.as_deref(), state.default_count).map_err(|e| {
        warn!(n = ?params.n, error = %e, "Rejected top picks request");
        (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
    })?;

    Ok(Json(state.ranking.rank_top(count).await))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/predict/top", get(top_picks))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire the Yahoo source and a seeded random forest into a ranking service
/// and serve it.
pub async fn start_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let source = Arc::new(YahooChartSource::new(config.yahoo_base_url.clone())?);
    let classifier = Arc::new(RandomForestFactory::new(config.forest.clone()));
    info!(
        base_url = source.base_url(),
        classifier = classifier.name(),
        features = ?FEATURE_NAMES,
        "Scoring with {} over {} features",
        classifier.name(),
        FEATURE_NAMES.len()
    );
    let ranking = RankingService::from_config(&config, source, classifier).with_metrics(metrics.clone());

    let state = AppState {
        metrics,
        start_time: Arc::new(Instant::now()),
        ranking: Arc::new(ranking),
        default_count: config.default_count,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Top picks available at http://0.0.0.0:{}/predict/top?n={}",
        config.port, config.default_count
    );
    axum::serve(listener, app).await?;

    Ok(())
}
