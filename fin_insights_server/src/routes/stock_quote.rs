//! `/stock_quote` routes: latest price with fallback, Alpha Vantage adjusted
//! daily close, Tiingo end-of-day close.

use axum::extract::State;
use axum::Json;
use fin_insights_lib::validation::{validate_date, validate_ticker};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ErrorBody};
use crate::extract::ValidQuery;
use crate::state::SharedState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TickerQuery {
    /// Stock ticker symbol, e.g. `AAPL`.
    pub ticker: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EodQuery {
    /// Stock ticker symbol, e.g. `AAPL`.
    pub ticker: String,
    /// Trading day as `YYYY-MM-DD`; the latest available day when omitted.
    pub date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockQuote {
    #[schema(example = "AAPL")]
    pub ticker: String,
    /// Price as text; `"N/A"` when no provider had one.
    #[schema(example = "231.7800")]
    pub latest_price: String,
    /// `alpha_vantage`, `tiingo` or `yfinance`.
    pub source: Option<String>,
    pub as_of: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyAdjusted {
    pub ticker: String,
    #[schema(example = "2024-10-18")]
    pub date: String,
    pub adjusted_close: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EndOfDay {
    pub ticker: String,
    #[schema(example = "2024-10-18")]
    pub date: String,
    pub close: f64,
    pub adj_close: f64,
}

#[utoipa::path(
    get,
    path = "/stock_quote/",
    tag = "stock_quote",
    params(TickerQuery),
    responses(
        (status = 200, description = "Latest price, or \"N/A\" when every provider failed", body = StockQuote),
        (status = 400, description = "Invalid ticker", body = ErrorBody),
        (status = 422, description = "Missing ticker", body = ErrorBody),
        (status = 500, description = "Alpha Vantage key not configured", body = ErrorBody),
    )
)]
pub async fn latest_quote(
    State(state): State<SharedState>,
    ValidQuery(query): ValidQuery<TickerQuery>,
) -> Result<Json<StockQuote>, ApiError> {
    let ticker = validate_ticker(&query.ticker)?;

    let quote = match state.quotes.latest_quote(&ticker).await? {
        Some(quote) => StockQuote {
            ticker,
            latest_price: quote.price,
            source: Some(quote.source.to_string()),
            as_of: quote.as_of,
        },
        None => {
            tracing::warn!("No provider returned a price for {}", ticker);
            StockQuote {
                ticker,
                latest_price: "N/A".to_string(),
                source: None,
                as_of: None,
            }
        }
    };
    Ok(Json(quote))
}

#[utoipa::path(
    get,
    path = "/stock_quote/daily_adjusted",
    tag = "stock_quote",
    params(TickerQuery),
    responses(
        (status = 200, description = "Latest adjusted daily close", body = DailyAdjusted),
        (status = 400, description = "Invalid ticker", body = ErrorBody),
        (status = 404, description = "No daily data", body = ErrorBody),
        (status = 503, description = "Alpha Vantage is throttling", body = ErrorBody),
    )
)]
pub async fn daily_adjusted(
    State(state): State<SharedState>,
    ValidQuery(query): ValidQuery<TickerQuery>,
) -> Result<Json<DailyAdjusted>, ApiError> {
    let ticker = validate_ticker(&query.ticker)?;
    let close = state.quotes.daily_adjusted(&ticker).await?;
    Ok(Json(DailyAdjusted {
        ticker,
        date: close.date,
        adjusted_close: close.adjusted_close,
    }))
}

#[utoipa::path(
    get,
    path = "/stock_quote/eod",
    tag = "stock_quote",
    params(EodQuery),
    responses(
        (status = 200, description = "End-of-day close", body = EndOfDay),
        (status = 400, description = "Invalid ticker or date", body = ErrorBody),
        (status = 404, description = "No end-of-day data", body = ErrorBody),
        (status = 500, description = "Tiingo key not configured", body = ErrorBody),
    )
)]
pub async fn end_of_day(
    State(state): State<SharedState>,
    ValidQuery(query): ValidQuery<EodQuery>,
) -> Result<Json<EndOfDay>, ApiError> {
    let ticker = validate_ticker(&query.ticker)?;
    let date = query.date.as_deref().map(validate_date).transpose()?;

    let eod = state.quotes.end_of_day(&ticker, date).await?;
    Ok(Json(EndOfDay {
        ticker,
        date: eod.date,
        close: eod.close,
        adj_close: eod.adj_close,
    }))
}
