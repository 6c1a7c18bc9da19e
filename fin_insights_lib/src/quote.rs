//! Latest-price lookup with provider fallback.
//!
//! Alpha Vantage `GLOBAL_QUOTE` is asked first. Anything short of a usable
//! price (throttling notice, empty `Global Quote`, placeholder price, HTTP or
//! network failure, spent request budget) falls through to Tiingo IEX and
//! then to Yahoo Finance 1-minute bars. Each fallback failure is logged and
//! never fails the request; when every provider comes up empty the caller
//! gets `Ok(None)`.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;

use crate::cache::MemoryCache;
use crate::config::{AppConfig, QuoteConfig};
use crate::error::FinInsightsError;
use crate::rate_limiter::RateLimiter;
use crate::retry::{with_retry, RetryPolicy};
use crate::tiingo::TiingoClient;
use crate::yahoo::YahooClient;

/// Which provider produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSource {
    AlphaVantage,
    Tiingo,
    Yfinance,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlphaVantage => "alpha_vantage",
            Self::Tiingo => "tiingo",
            Self::Yfinance => "yfinance",
        }
    }
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved latest price.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestQuote {
    /// Alpha Vantage's string verbatim, or a fallback float via [`format_price`].
    pub price: String,
    pub source: QuoteSource,
    /// Trading day or bar timestamp, in the provider's own format.
    pub as_of: Option<String>,
}

/// Latest split/dividend-adjusted daily close from Alpha Vantage.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedClose {
    pub date: String,
    pub adjusted_close: f64,
}

/// End-of-day close from Tiingo.
#[derive(Debug, Clone, PartialEq)]
pub struct EodClose {
    pub date: String,
    pub close: f64,
    pub adj_close: f64,
}

/// The provider clients a [`QuoteService`] may use. `None` disables a provider.
#[derive(Default)]
pub struct QuoteProviders {
    pub alpha_vantage: Option<alphavantage_api::Client>,
    pub tiingo: Option<TiingoClient>,
    pub yahoo: Option<YahooClient>,
}

/// Render a fallback price the way the JSON clients expect:
/// integral values keep one decimal (`187.0`), others use the shortest
/// round-tripping representation (`187.25`).
pub fn format_price(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 && price.abs() < 1e16 {
        format!("{:.1}", price)
    } else {
        format!("{}", price)
    }
}

fn is_transient_alpha_vantage(err: &FinInsightsError) -> bool {
    matches!(err, FinInsightsError::AlphaVantage(e) if e.is_transient())
}

/// Provider fallback chain plus the quote cache and Alpha Vantage budget.
pub struct QuoteService {
    providers: QuoteProviders,
    limiter: RateLimiter,
    cache: MemoryCache<LatestQuote>,
    retry: RetryPolicy,
    delay: Duration,
}

impl QuoteService {
    pub fn new(providers: QuoteProviders, config: &QuoteConfig) -> Self {
        Self {
            providers,
            limiter: RateLimiter::per_minute(config.alpha_vantage_per_minute),
            cache: MemoryCache::new(config.cache_ttl),
            retry: config.retry,
            delay: config.delay,
        }
    }

    /// Builds the production clients for every provider that is configured.
    ///
    /// Yahoo Finance needs no key; if its connector cannot be built the
    /// service runs without it.
    pub fn from_config(config: &AppConfig) -> Result<Self, FinInsightsError> {
        let alpha_vantage = config
            .alpha_vantage_api_key
            .clone()
            .map(alphavantage_api::Client::new)
            .transpose()?;
        let tiingo = config
            .tiingo_api_key
            .clone()
            .map(TiingoClient::new)
            .transpose()?;
        let yahoo = match YahooClient::new() {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Yahoo Finance fallback disabled: {}", e);
                None
            }
        };
        Ok(Self::new(
            QuoteProviders {
                alpha_vantage,
                tiingo,
                yahoo,
            },
            &config.quote,
        ))
    }

    pub fn has_alpha_vantage(&self) -> bool {
        self.providers.alpha_vantage.is_some()
    }

    pub fn has_tiingo(&self) -> bool {
        self.providers.tiingo.is_some()
    }

    pub fn has_yahoo(&self) -> bool {
        self.providers.yahoo.is_some()
    }

    /// Remaining Alpha Vantage calls in the current minute, if known.
    pub fn alpha_vantage_budget(&self) -> Option<u64> {
        self.limiter.remaining_budget()
    }

    fn alpha_vantage(&self) -> Result<&alphavantage_api::Client, FinInsightsError> {
        self.providers
            .alpha_vantage
            .as_ref()
            .ok_or(FinInsightsError::MissingApiKey("Alpha Vantage"))
    }

    /// Latest price for `ticker`, trying each provider in turn.
    ///
    /// Fails only when Alpha Vantage is not configured. `Ok(None)` means every
    /// provider was tried and none had a price.
    pub async fn latest_quote(&self, ticker: &str) -> Result<Option<LatestQuote>, FinInsightsError> {
        let client = self.alpha_vantage()?;
        let symbol = ticker.to_uppercase();

        if let Some(hit) = self.cache.get(&symbol) {
            tracing::debug!("Quote cache hit for {}", symbol);
            return Ok(Some(hit));
        }

        let quote = match self.alpha_vantage_quote(client, &symbol).await {
            Some(quote) => Some(quote),
            None => self.fallback_quote(&symbol).await,
        };

        if let Some(quote) = &quote {
            self.cache.set(symbol, quote.clone());
        }
        Ok(quote)
    }

    /// Runs an Alpha Vantage request under the retry policy. Every attempt,
    /// retries included, spends one slot of the per-minute budget; an empty
    /// budget ends the attempts with [`FinInsightsError::RateLimited`].
    async fn call_alpha_vantage<T, F, Fut>(&self, label: &str, f: F) -> Result<T, FinInsightsError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, alphavantage_api::Error>>,
    {
        let limiter = &self.limiter;
        let f = &f;
        with_retry(&self.retry, label, is_transient_alpha_vantage, move || async move {
            if !limiter.try_acquire().await {
                return Err(FinInsightsError::RateLimited(
                    "Alpha Vantage request budget exhausted, try again in a minute".to_string(),
                ));
            }
            f().await.map_err(FinInsightsError::from)
        })
        .await
    }

    async fn alpha_vantage_quote(
        &self,
        client: &alphavantage_api::Client,
        symbol: &str,
    ) -> Option<LatestQuote> {
        let resp = match self
            .call_alpha_vantage("Alpha Vantage GLOBAL_QUOTE", || client.get_global_quote(symbol))
            .await
        {
            Ok(resp) => resp,
            Err(FinInsightsError::RateLimited(_)) => {
                tracing::warn!(
                    "Alpha Vantage budget of {}/min spent, using fallback providers for {}",
                    self.limiter.max_requests(),
                    symbol
                );
                return None;
            }
            Err(e) => {
                tracing::warn!("Alpha Vantage quote failed for {}: {}", symbol, e);
                return None;
            }
        };

        if let Some(price) = resp.price() {
            return Some(LatestQuote {
                price: price.to_string(),
                source: QuoteSource::AlphaVantage,
                as_of: resp
                    .global_quote
                    .as_ref()
                    .and_then(|q| q.latest_trading_day.clone()),
            });
        }

        match resp.advisory.message() {
            Some(msg) => tracing::warn!("Alpha Vantage advisory for {}: {}", symbol, msg),
            None => tracing::info!(
                "Alpha Vantage returned no price for {}, falling back to Tiingo/yfinance",
                symbol
            ),
        }
        None
    }

    /// Tiingo IEX, then Yahoo Finance. Provider errors are logged, not returned.
    pub async fn fallback_quote(&self, symbol: &str) -> Option<LatestQuote> {
        if let Some(tiingo) = &self.providers.tiingo {
            match tiingo.get_iex_last(symbol).await {
                Ok(Some(iex)) => {
                    tracing::info!("Retrieved price for {} from Tiingo IEX", symbol);
                    return Some(LatestQuote {
                        price: format_price(iex.price),
                        source: QuoteSource::Tiingo,
                        as_of: iex.timestamp,
                    });
                }
                Ok(None) => tracing::info!("Tiingo IEX has no price for {}", symbol),
                Err(e) => tracing::warn!("Tiingo IEX failed for {}: {}", symbol, e),
            }
        } else {
            tracing::debug!("Tiingo API key not set, skipping Tiingo IEX");
        }

        if let Some(yahoo) = &self.providers.yahoo {
            match yahoo.get_delayed_price(symbol, self.delay).await {
                Ok(Some(delayed)) => {
                    tracing::info!(
                        "Retrieved price for {} from yfinance at {}",
                        symbol,
                        delayed.timestamp
                    );
                    return Some(LatestQuote {
                        price: format_price(delayed.price),
                        source: QuoteSource::Yfinance,
                        as_of: Some(delayed.timestamp),
                    });
                }
                Ok(None) => tracing::info!("yfinance has no delayed price for {}", symbol),
                Err(e) => tracing::warn!("yfinance failed for {}: {}", symbol, e),
            }
        }

        tracing::warn!("Failed to retrieve price for {} from every provider", symbol);
        None
    }

    /// Latest adjusted daily close from Alpha Vantage.
    pub async fn daily_adjusted(&self, ticker: &str) -> Result<AdjustedClose, FinInsightsError> {
        let client = self.alpha_vantage()?;
        let symbol = ticker.to_uppercase();

        let resp = self
            .call_alpha_vantage("Alpha Vantage TIME_SERIES_DAILY_ADJUSTED", || {
                client.get_daily_adjusted(&symbol)
            })
            .await?;

        if resp.advisory.is_throttled() {
            let msg = resp.advisory.message().unwrap_or_default().to_string();
            tracing::warn!("Alpha Vantage advisory for {}: {}", symbol, msg);
            return Err(FinInsightsError::RateLimited(msg));
        }

        let (date, bar) = resp
            .latest()
            .ok_or_else(|| FinInsightsError::NotFound(format!("No daily data found for {}", symbol)))?;
        let adjusted_close = bar.adjusted_close().ok_or_else(|| {
            FinInsightsError::AlphaVantage(alphavantage_api::Error::InvalidResponse(format!(
                "unparseable adjusted close '{}' for {} on {}",
                bar.adjusted_close, symbol, date
            )))
        })?;

        Ok(AdjustedClose {
            date: date.to_string(),
            adjusted_close,
        })
    }

    /// Tiingo end-of-day close, for `date` or the latest trading day.
    pub async fn end_of_day(
        &self,
        ticker: &str,
        date: Option<NaiveDate>,
    ) -> Result<EodClose, FinInsightsError> {
        let tiingo = self
            .providers
            .tiingo
            .as_ref()
            .ok_or(FinInsightsError::MissingApiKey("Tiingo"))?;
        let symbol = ticker.to_uppercase();

        let record = match date {
            Some(date) => tiingo.get_price_on_date(&symbol, date).await?,
            None => tiingo.get_latest_eod(&symbol).await?,
        };

        let record = record.ok_or_else(|| {
            FinInsightsError::NotFound(format!("No end-of-day data found for {}", symbol))
        })?;

        Ok(EodClose {
            date: record.date.get(..10).unwrap_or(&record.date).to_string(),
            close: record.close,
            adj_close: record.adj_close,
        })
    }
}
