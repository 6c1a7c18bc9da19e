//! Tiingo API client for IEX intraday and end-of-day prices.

use super::error::TiingoError;
use super::types::{TiingoDailyPrice, TiingoIexQuote};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Request timeout for Tiingo API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The last IEX trade price for a ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct IexPrice {
    pub price: f64,
    pub timestamp: Option<String>,
}

/// Tiingo REST API client.
pub struct TiingoClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TiingoClient {
    /// Create a new TiingoClient with default base URL.
    pub fn new(api_key: String) -> Result<Self, TiingoError> {
        Self::with_base_url("https://api.tiingo.com", api_key)
    }

    /// Create a new TiingoClient with custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self, TiingoError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Returns `Ok(None)` on 404. Tiingo quirk: rate limits return HTTP 200
    /// with Content-Type text/plain instead of a proper 429 status code.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, TiingoError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", "application/json")
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TiingoError::InvalidApiKey);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TiingoError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(TiingoError::ParseFailed(format!(
                "HTTP {}: {}",
                status,
                snippet(&body, 200)
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        let body = response.text().await.map_err(|e| {
            TiingoError::ParseFailed(format!("Failed to read response body: {}", e))
        })?;

        if content_type.contains("text/plain") || content_type.contains("text/html") {
            let lower = body.to_lowercase();
            if lower.contains("rate limit")
                || lower.contains("too many requests")
                || lower.contains("error")
            {
                return Err(TiingoError::RateLimited);
            }
        }

        serde_json::from_str(&body).map(Some).map_err(|e| {
            TiingoError::ParseFailed(format!(
                "Failed to deserialize response: {} | body: {}",
                e,
                snippet(&body, 500)
            ))
        })
    }

    /// Latest IEX trade price for `ticker`.
    ///
    /// Returns `Ok(None)` when Tiingo has no IEX data for the ticker: an empty
    /// list, an entry for a different ticker, or a null `last` price.
    pub async fn get_iex_last(&self, ticker: &str) -> Result<Option<IexPrice>, TiingoError> {
        let quotes: Vec<TiingoIexQuote> = match self
            .get_json("/iex/", &[("tickers", ticker.to_string())])
            .await?
        {
            Some(quotes) => quotes,
            None => return Ok(None),
        };

        let Some(quote) = quotes.into_iter().next() else {
            tracing::debug!("No IEX data found for {} on Tiingo", ticker);
            return Ok(None);
        };
        if !quote.ticker.eq_ignore_ascii_case(ticker) {
            tracing::warn!(
                "Tiingo IEX returned data for an unexpected ticker: {} (wanted {})",
                quote.ticker,
                ticker
            );
            return Ok(None);
        }
        let Some(price) = quote.last else {
            tracing::debug!("No 'last' price in Tiingo IEX response for {}", ticker);
            return Ok(None);
        };

        Ok(Some(IexPrice {
            price,
            timestamp: quote.timestamp,
        }))
    }

    /// End-of-day record for a ticker on a specific date.
    ///
    /// Returns `Ok(None)` if the ticker is unknown (404) or no data exists for
    /// that date (empty array, e.g. weekends and holidays).
    pub async fn get_price_on_date(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<Option<TiingoDailyPrice>, TiingoError> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let path = format!("/tiingo/daily/{}/prices", ticker);
        let prices: Option<Vec<TiingoDailyPrice>> = self
            .get_json(
                &path,
                &[("startDate", date_str.clone()), ("endDate", date_str)],
            )
            .await?;
        Ok(prices.and_then(|p| p.into_iter().next()))
    }

    /// Most recent end-of-day record for a ticker.
    ///
    /// Without a date range Tiingo answers with the latest trading day only.
    pub async fn get_latest_eod(
        &self,
        ticker: &str,
    ) -> Result<Option<TiingoDailyPrice>, TiingoError> {
        let path = format!("/tiingo/daily/{}/prices", ticker);
        let prices: Option<Vec<TiingoDailyPrice>> = self.get_json(&path, &[]).await?;
        Ok(prices.and_then(|p| p.into_iter().last()))
    }
}

fn snippet(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
