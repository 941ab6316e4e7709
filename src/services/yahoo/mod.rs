//! Yahoo Finance daily history source

pub mod client;
pub mod types;

pub use client::{YahooChartSource, DEFAULT_BASE_URL};
