use serde::{Deserialize, Serialize};

use super::Advisory;

/// Response body of `function=GLOBAL_QUOTE`.
///
/// Unknown symbols come back as `{"Global Quote": {}}`, so every field of
/// [`GlobalQuote`] is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default, skip_serializing_if = "Option::is_none")]
    pub global_quote: Option<GlobalQuote>,
    #[serde(flatten)]
    pub advisory: Advisory,
}

impl GlobalQuoteResponse {
    /// The quoted price, if present and not a placeholder.
    pub fn price(&self) -> Option<&str> {
        self.global_quote.as_ref().and_then(GlobalQuote::price)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "02. open")]
    pub open: Option<String>,
    #[serde(rename = "03. high")]
    pub high: Option<String>,
    #[serde(rename = "04. low")]
    pub low: Option<String>,
    #[serde(rename = "05. price")]
    pub price: Option<String>,
    #[serde(rename = "06. volume")]
    pub volume: Option<String>,
    #[serde(rename = "07. latest trading day")]
    pub latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close")]
    pub previous_close: Option<String>,
    #[serde(rename = "09. change")]
    pub change: Option<String>,
    #[serde(rename = "10. change percent")]
    pub change_percent: Option<String>,
}

impl GlobalQuote {
    pub fn price(&self) -> Option<&str> {
        self.price
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != "N/A")
    }
}
