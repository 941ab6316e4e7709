//! Yahoo Finance chart client

use super::types::{Chart, ChartResponse};
use crate::error::SourceError;
use crate::models::bar::RawBar;
use crate::services::market_data::{HistoryRequest, TimeSeriesSource};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; toppicks/0.1)";

/// Daily history from the public v8 chart endpoint.
pub struct YahooChartSource {
    client: Client,
    base_url: String,
}

impl YahooChartSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chart endpoint for `symbol`, percent-encoded as a single path segment.
    fn chart_url(&self, symbol: &str) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SourceError::Http(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Http(format!("base url {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

#[async_trait]
impl TimeSeriesSource for YahooChartSource {
    async fn fetch_history(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Vec<RawBar>, SourceError> {
        let url = self.chart_url(symbol)?;
        debug!(symbol = %symbol, range = %request.range, interval = %request.interval, "Fetching chart from {}", url);

        let response = self
            .client
            .get(url)
            .query(&[
                ("range", request.range.as_str()),
                ("interval", request.interval.as_str()),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        // Error responses still carry a chart envelope with a description.
        let parsed = serde_json::from_str::<ChartResponse>(&body);
        if !status.is_success() {
            return Err(match parsed {
                Ok(ChartResponse {
                    chart: Chart { error: Some(err), .. },
                }) => SourceError::Api {
                    symbol: symbol.to_string(),
                    message: format!("{}: {}", err.code, err.description),
                },
                _ => SourceError::Status {
                    symbol: symbol.to_string(),
                    status: status.as_u16(),
                },
            });
        }

        let chart = parsed.map_err(|e| SourceError::Decode(e.to_string()))?.chart;
        if let Some(err) = chart.error {
            return Err(SourceError::Api {
                symbol: symbol.to_string(),
                message: format!("{}: {}", err.code, err.description),
            });
        }

        let result = chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| SourceError::Unavailable(symbol.to_string()))?;

        let bars = result.into_bars();
        debug!(symbol = %symbol, count = bars.len(), "Fetched {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}
