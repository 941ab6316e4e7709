//! Yahoo Finance v8 chart response types

use crate::models::bar::RawBar;
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartMeta {
    pub symbol: Option<String>,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Column-oriented OHLCV; halted or partial sessions show up as nulls.
#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartResult {
    /// Convert columns to ascending daily bars.
    ///
    /// Rows with any missing value are skipped. When several rows fall on
    /// the same exchange-local date (Yahoo appends the live session), the
    /// last one in the payload wins.
    pub fn into_bars(self) -> Vec<RawBar> {
        let offset = self.meta.gmtoffset;
        let Some(quote) = self.indicators.quote.into_iter().next() else {
            return Vec::new();
        };

        let mut by_date: BTreeMap<NaiveDate, RawBar> = BTreeMap::new();
        for (i, ts) in self.timestamp.iter().enumerate() {
            let values = (
                column(&quote.open, i),
                column(&quote.high, i),
                column(&quote.low, i),
                column(&quote.close, i),
                column(&quote.volume, i),
            );
            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = values else {
                continue;
            };
            let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
                continue;
            };

            by_date.insert(date, RawBar::new(open, high, low, close, volume, date));
        }

        by_date.into_values().collect()
    }
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}
