//! Prometheus metrics for the HTTP layer and the ranking pipeline.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub rankings_total: IntCounter,
    pub ranking_duration_seconds: Histogram,
    pub symbols_scored_total: IntCounter,
    pub symbols_unscoreable_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let rankings_total = IntCounter::new("rankings_total", "Ranking requests completed")?;
        let ranking_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "ranking_duration_seconds",
                "Time to score and rank the universe in seconds",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        let symbols_scored_total =
            IntCounter::new("symbols_scored_total", "Symbols that produced a score")?;
        let symbols_unscoreable_total = IntCounterVec::new(
            Opts::new(
                "symbols_unscoreable_total",
                "Symbols that could not be scored, by reason",
            ),
            &["reason"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(rankings_total.clone()))?;
        registry.register(Box::new(ranking_duration_seconds.clone()))?;
        registry.register(Box::new(symbols_scored_total.clone()))?;
        registry.register(Box::new(symbols_unscoreable_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            rankings_total,
            ranking_duration_seconds,
            symbols_scored_total,
            symbols_unscoreable_total,
        })
    }

    /// Text exposition of every registered metric.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
