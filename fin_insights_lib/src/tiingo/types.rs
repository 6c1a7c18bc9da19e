//! Response types for Tiingo API.

use serde::{Deserialize, Serialize};

/// A single daily price record from the Tiingo end-of-day API.
///
/// The response is a JSON array of these records, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiingoDailyPrice {
    pub date: String,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub volume: i64,
    pub adj_close: f64,
    #[serde(default)]
    pub adj_high: Option<f64>,
    #[serde(default)]
    pub adj_low: Option<f64>,
    #[serde(default)]
    pub adj_open: Option<f64>,
    #[serde(default)]
    pub adj_volume: Option<i64>,
    #[serde(default)]
    pub div_cash: Option<f64>,
    #[serde(default)]
    pub split_factor: Option<f64>,
}

/// One element of the IEX top-of-book response (`/iex/?tickers=...`).
///
/// Outside market hours and for thinly traded symbols `last` is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiingoIexQuote {
    pub ticker: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub last: Option<f64>,
    #[serde(default)]
    pub tngo_last: Option<f64>,
    #[serde(default)]
    pub prev_close: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}
