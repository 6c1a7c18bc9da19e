use axum::extract::State;
use axum::Json;
use fin_insights_lib::FinancialInsights;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ErrorBody};
use crate::extract::ValidQuery;
use crate::state::SharedState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InsightsQuery {
    /// Stock ticker symbol, e.g. `AAPL`.
    pub ticker: String,
    /// Also return the income statement, balance sheet and cash flow.
    #[serde(default)]
    pub detailed: bool,
}

/// Fields are passed through from the fin-insight document.
#[derive(Debug, Serialize, ToSchema)]
pub struct FinancialInsightsResponse {
    #[schema(example = "AAPL")]
    pub ticker: String,
    #[schema(value_type = Object)]
    pub latest_price: Value,
    #[schema(value_type = Object)]
    pub sentiment_summary: Value,
    #[serde(rename = "financialHighlights")]
    #[schema(value_type = Object)]
    pub financial_highlights: Value,
    #[schema(value_type = Object)]
    pub rating: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub income_statement: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub balance_sheet: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub cash_flow: Option<Value>,
}

impl From<FinancialInsights> for FinancialInsightsResponse {
    fn from(i: FinancialInsights) -> Self {
        let (income_statement, balance_sheet, cash_flow) = match i.details {
            Some(d) => (
                Some(d.income_statement),
                Some(d.balance_sheet),
                Some(d.cash_flow),
            ),
            None => (None, None, None),
        };
        Self {
            ticker: i.ticker,
            latest_price: i.latest_price,
            sentiment_summary: i.sentiment_summary,
            financial_highlights: i.financial_highlights,
            rating: i.rating,
            income_statement,
            balance_sheet,
            cash_flow,
        }
    }
}

#[utoipa::path(
    get,
    path = "/financial_insights/",
    tag = "financial_insights",
    params(InsightsQuery),
    responses(
        (status = 200, description = "Fundamentals and sentiment for the ticker", body = FinancialInsightsResponse),
        (status = 400, description = "Invalid ticker", body = ErrorBody),
        (status = 422, description = "Missing ticker", body = ErrorBody),
        (status = 500, description = "fin-insight missing or failed", body = ErrorBody),
    )
)]
pub async fn financial_insights(
    State(state): State<SharedState>,
    ValidQuery(query): ValidQuery<InsightsQuery>,
) -> Result<Json<FinancialInsightsResponse>, ApiError> {
    let insights = state
        .insights
        .insights(&query.ticker, query.detailed)
        .await?;
    Ok(Json(insights.into()))
}
