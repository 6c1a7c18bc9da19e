//! HTTP client for the Alpha Vantage `query` API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::Query,
    types::{DailyAdjustedResponse, GlobalQuoteResponse},
    Error,
};

/// Request timeout for Alpha Vantage calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Alpha Vantage API.
///
/// Every request goes to `{base}/query` with the API key appended as the
/// `apikey` parameter. One `reqwest::Client` is shared across requests.
pub struct Client {
    client: reqwest::Client,
    api_key: String,
    /// Base URL for the API. Defaults to `https://www.alphavantage.co`.
    base_api_url: String,
}

impl Client {
    /// Creates a new client pointing at the production Alpha Vantage API.
    pub fn new(api_key: String) -> Result<Self, Error> {
        Self::with_base_url("https://www.alphavantage.co", api_key)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed(e.to_string())
            })?;
        Ok(Self {
            client,
            api_key,
            base_api_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_url(&self, query: &Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}/query", &self.base_api_url).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed(e.to_string())
        })?;
        let mut url = query.add_to_url(&url);
        url.query_pairs_mut().append_pair("apikey", &self.api_key);
        Ok(url)
    }

    async fn get<T>(&self, query: &Query) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let url = self.get_url(query)?;
        let resp = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {} for {}: {}", query.function, query.symbol, e);
                Error::RequestFailed(e.to_string())
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::InvalidResponse(e.to_string())
        })
    }

    /// Fetches the latest quote for a symbol.
    pub async fn get_global_quote(&self, symbol: &str) -> Result<GlobalQuoteResponse, Error> {
        self.get(&Query::global_quote(symbol)).await
    }

    /// Fetches the compact (last 100 trading days) adjusted daily series.
    pub async fn get_daily_adjusted(&self, symbol: &str) -> Result<DailyAdjustedResponse, Error> {
        self.get(&Query::daily_adjusted(symbol)).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
