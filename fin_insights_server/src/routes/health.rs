use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::SharedState;

/// Which upstream providers this instance can use.
#[derive(Debug, Serialize, ToSchema)]
pub struct Providers {
    pub alpha_vantage: bool,
    pub tiingo: bool,
    pub yfinance: bool,
    pub fin_insight: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    #[schema(example = "ok")]
    pub status: String,
    pub providers: Providers,
    /// Alpha Vantage calls left in the current one-minute window.
    pub alpha_vantage_budget: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "general",
    responses((status = 200, description = "Service is up", body = Health))
)]
pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    let quotes = &state.quotes;
    Json(Health {
        status: "ok".to_string(),
        providers: Providers {
            alpha_vantage: quotes.has_alpha_vantage(),
            tiingo: quotes.has_tiingo(),
            yfinance: quotes.has_yahoo(),
            fin_insight: state.insights.is_available(),
        },
        alpha_vantage_budget: quotes.alpha_vantage_budget(),
    })
}
