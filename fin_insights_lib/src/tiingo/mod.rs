//! Tiingo API client module.
//!
//! Two endpoints are used: IEX top-of-book for the intraday fallback quote,
//! and end-of-day prices for the `/stock_quote/eod` route.

pub mod client;
pub mod error;
pub mod types;

pub use client::{IexPrice, TiingoClient};
pub use error::TiingoError;
pub use types::{TiingoDailyPrice, TiingoIexQuote};
