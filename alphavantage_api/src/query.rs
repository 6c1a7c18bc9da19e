//! Query builder for the `/query` endpoint.

use std::fmt;

use url::Url;

/// The Alpha Vantage `function` parameter values this client supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Latest price and volume for a single symbol.
    GlobalQuote,
    /// Daily OHLCV with split/dividend-adjusted close.
    TimeSeriesDailyAdjusted,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::GlobalQuote => "GLOBAL_QUOTE",
            Self::TimeSeriesDailyAdjusted => "TIME_SERIES_DAILY_ADJUSTED",
        };
        write!(f, "{}", s)
    }
}

/// A single `/query` request: one function applied to one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub function: Function,
    pub symbol: String,
}

impl Query {
    pub fn global_quote(symbol: &str) -> Self {
        Self {
            function: Function::GlobalQuote,
            symbol: symbol.to_string(),
        }
    }

    pub fn daily_adjusted(symbol: &str) -> Self {
        Self {
            function: Function::TimeSeriesDailyAdjusted,
            symbol: symbol.to_string(),
        }
    }

    /// Appends this query's parameters to the given URL, returning the modified URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("function", &self.function.to_string());
            pairs.append_pair("symbol", &self.symbol);
        }
        url
    }
}
