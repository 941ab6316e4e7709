use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of price and volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawBar {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64, date: NaiveDate) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar whose open, high, low and close all sit at `close`.
    pub fn flat(close: f64, volume: f64, date: NaiveDate) -> Self {
        Self::new(close, close, close, close, volume, date)
    }
}
