//! Unit tests for Yahoo chart payload conversion

use chrono::NaiveDate;
use serde_json::json;
use toppicks::services::yahoo::types::ChartResponse;

fn parse(value: serde_json::Value) -> ChartResponse {
    serde_json::from_value(value).expect("valid chart payload")
}

#[test]
fn test_converts_columns_to_bars() {
    // 2024-01-02 and 2024-01-03, 14:30 UTC.
    let response = parse(json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "AAPL", "gmtoffset": -18000 },
                "timestamp": [1704205800, 1704292200],
                "indicators": { "quote": [{
                    "open": [185.0, 184.2],
                    "high": [186.0, 185.9],
                    "low": [183.0, 183.4],
                    "close": [185.6, 184.25],
                    "volume": [82488700, 58414500]
                }]}
            }],
            "error": null
        }
    }));

    let result = response.chart.result.unwrap().into_iter().next().unwrap();
    let bars = result.into_bars();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(bars[0].close, 185.6);
    assert_eq!(bars[1].volume, 58_414_500.0);
}

#[test]
fn test_skips_rows_with_nulls() {
    let response = parse(json!({
        "chart": {
            "result": [{
                "meta": { "gmtoffset": 0 },
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": { "quote": [{
                    "open": [1.0, null, 3.0],
                    "high": [1.0, 2.0, 3.0],
                    "low": [1.0, 2.0, 3.0],
                    "close": [1.0, 2.0, 3.0],
                    "volume": [10, 20, null]
                }]}
            }],
            "error": null
        }
    }));

    let bars = response.chart.result.unwrap().remove(0).into_bars();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].close, 1.0);
}

#[test]
fn test_later_row_wins_on_same_day() {
    // Closing bar at 14:30 UTC, then the live session a few hours later.
    let response = parse(json!({
        "chart": {
            "result": [{
                "meta": { "gmtoffset": -18000 },
                "timestamp": [1704205800, 1704220200],
                "indicators": { "quote": [{
                    "open": [1.0, 2.0],
                    "high": [1.0, 2.0],
                    "low": [1.0, 2.0],
                    "close": [1.0, 2.0],
                    "volume": [10, 20]
                }]}
            }],
            "error": null
        }
    }));

    let bars = response.chart.result.unwrap().remove(0).into_bars();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].close, 2.0);
}

#[test]
fn test_out_of_order_duplicates_keep_last_row() {
    // 2024-01-02, 2024-01-03, then 2024-01-02 again.
    let response = parse(json!({
        "chart": {
            "result": [{
                "meta": { "gmtoffset": 0 },
                "timestamp": [1704205800, 1704292200, 1704220200],
                "indicators": { "quote": [{
                    "open": [1.0, 2.0, 3.0],
                    "high": [1.0, 2.0, 3.0],
                    "low": [1.0, 2.0, 3.0],
                    "close": [1.0, 2.0, 3.0],
                    "volume": [10, 20, 30]
                }]}
            }],
            "error": null
        }
    }));

    let bars = response.chart.result.unwrap().remove(0).into_bars();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(bars[0].close, 3.0);
    assert_eq!(bars[1].close, 2.0);
}

#[test]
fn test_missing_quote_block() {
    let response = parse(json!({
        "chart": {
            "result": [{ "timestamp": [1704205800], "indicators": { "quote": [] } }],
            "error": null
        }
    }));
    assert!(response.chart.result.unwrap().remove(0).into_bars().is_empty());
}
