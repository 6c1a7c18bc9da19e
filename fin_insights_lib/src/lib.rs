//! Library layer for the Financial Insights API: provider clients, the quote
//! fallback chain, and the fin-insight subprocess runner.
//!
//! Wraps the `alphavantage_api` crate with Tiingo and Yahoo Finance fallbacks,
//! an in-memory TTL cache, request pacing, input validation and
//! environment-driven configuration.

pub mod arxiv;
pub mod cache;
pub mod config;
pub mod error;
pub mod insight;
pub mod quote;
pub mod rate_limiter;
pub mod retry;
pub mod tiingo;
pub mod validation;
pub mod yahoo;

pub use alphavantage_api;

pub use arxiv::{Article, ArxivClient, ArxivError, Author, Category};
pub use config::{AppConfig, ConfigError, InsightConfig, QuoteConfig};
pub use error::FinInsightsError;
pub use insight::{FinancialInsights, InsightDetails, InsightError, InsightService};
pub use quote::{AdjustedClose, EodClose, LatestQuote, QuoteProviders, QuoteService, QuoteSource};
pub use tiingo::{TiingoClient, TiingoError};
pub use yahoo::{YahooClient, YahooError};
