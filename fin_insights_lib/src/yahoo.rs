//! Yahoo Finance client wrapper for the delayed intraday fallback price.
//!
//! Fetches the last two days of 1-minute bars and picks the close of the most
//! recent bar that is at least `delay` old. Yahoo needs no API key, which makes
//! it the last provider in the quote fallback chain.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from Yahoo Finance operations.
#[derive(Error, Debug)]
pub enum YahooError {
    #[error("Delay of {0:?} is out of range")]
    InvalidDelay(Duration),
    #[error(transparent)]
    Upstream(#[from] yahoo_finance_api::YahooError),
}

/// A single intraday bar reduced to what the fallback needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntradayBar {
    /// Unix seconds of the bar's start.
    pub timestamp: i64,
    pub close: f64,
}

/// A delayed price and the time of the bar it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayedPrice {
    pub price: f64,
    /// `YYYY-MM-DD HH:MM:SS UTC`
    pub timestamp: String,
}

/// Pick the latest bar at or before `target` (unix seconds).
///
/// Bars with a non-finite or non-positive close are skipped; Yahoo fills
/// gaps in the minute series with zeros.
pub fn select_delayed_bar(bars: &[IntradayBar], target: i64) -> Option<IntradayBar> {
    bars.iter()
        .filter(|b| b.timestamp <= target && b.close.is_finite() && b.close > 0.0)
        .max_by_key(|b| b.timestamp)
        .copied()
}

/// Render unix seconds as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_bar_time(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Yahoo Finance client.
pub struct YahooClient {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooClient {
    /// Create a new YahooClient with default configuration.
    pub fn new() -> Result<Self, YahooError> {
        Ok(Self {
            connector: yahoo_finance_api::YahooConnector::new()?,
        })
    }

    /// Approximate price of `ticker` as of `delay` ago.
    ///
    /// Returns `Ok(None)` when Yahoo has no bars for the ticker or none old enough.
    pub async fn get_delayed_price(
        &self,
        ticker: &str,
        delay: Duration,
    ) -> Result<Option<DelayedPrice>, YahooError> {
        let delay_secs = i64::try_from(delay.as_secs()).map_err(|_| YahooError::InvalidDelay(delay))?;
        let target = Utc::now().timestamp() - delay_secs;

        let response = self.connector.get_quote_range(ticker, "1m", "2d").await?;
        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::debug!("No 1-minute data available for {}: {}", ticker, e);
                return Ok(None);
            }
        };

        let bars: Vec<IntradayBar> = quotes
            .iter()
            .filter_map(|q| {
                Some(IntradayBar {
                    timestamp: i64::try_from(q.timestamp).ok()?,
                    close: q.close,
                })
            })
            .collect();

        let Some(bar) = select_delayed_bar(&bars, target) else {
            tracing::debug!(
                "No data available for {} before {}",
                ticker,
                format_bar_time(target).unwrap_or_default()
            );
            return Ok(None);
        };

        Ok(format_bar_time(bar.timestamp).map(|timestamp| DelayedPrice {
            price: bar.close,
            timestamp,
        }))
    }
}
