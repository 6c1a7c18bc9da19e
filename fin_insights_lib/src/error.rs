//! Error types for the library layer.

use std::fmt;

use crate::arxiv::ArxivError;
use crate::insight::InsightError;
use crate::tiingo::TiingoError;
use crate::yahoo::YahooError;

/// Errors produced by the library layer, wrapping provider errors and adding
/// configuration, lookup, and input validation failures.
#[derive(Debug)]
pub enum FinInsightsError {
    /// An error from the Alpha Vantage client.
    AlphaVantage(alphavantage_api::Error),
    /// An error from the Tiingo client.
    Tiingo(TiingoError),
    /// An error from the Yahoo Finance wrapper.
    Yahoo(YahooError),
    /// An error from the arXiv client.
    Arxiv(ArxivError),
    /// The fin-insight subprocess failed or produced unusable output.
    Insight(InsightError),
    /// The named provider needs an API key that is not configured.
    MissingApiKey(&'static str),
    /// The provider answered but has no data for the request.
    NotFound(String),
    /// The provider is throttling this API key.
    RateLimited(String),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for FinInsightsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphaVantage(e) => write!(f, "Alpha Vantage error: {}", e),
            Self::Tiingo(e) => write!(f, "Tiingo error: {}", e),
            Self::Yahoo(e) => write!(f, "Yahoo Finance error: {}", e),
            Self::Arxiv(e) => write!(f, "arXiv error: {}", e),
            Self::Insight(e) => write!(f, "{}", e),
            Self::MissingApiKey(provider) => write!(f, "{} API key not found", provider),
            Self::NotFound(msg) => write!(f, "{}", msg),
            Self::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for FinInsightsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AlphaVantage(e) => Some(e),
            Self::Tiingo(e) => Some(e),
            Self::Yahoo(e) => Some(e),
            Self::Arxiv(e) => Some(e),
            Self::Insight(e) => Some(e),
            _ => None,
        }
    }
}

impl From<alphavantage_api::Error> for FinInsightsError {
    fn from(e: alphavantage_api::Error) -> Self {
        Self::AlphaVantage(e)
    }
}

impl From<TiingoError> for FinInsightsError {
    fn from(e: TiingoError) -> Self {
        Self::Tiingo(e)
    }
}

impl From<YahooError> for FinInsightsError {
    fn from(e: YahooError) -> Self {
        Self::Yahoo(e)
    }
}

impl From<ArxivError> for FinInsightsError {
    fn from(e: ArxivError) -> Self {
        Self::Arxiv(e)
    }
}

impl From<InsightError> for FinInsightsError {
    fn from(e: InsightError) -> Self {
        Self::Insight(e)
    }
}
