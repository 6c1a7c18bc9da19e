//! OpenAPI document and the Swagger UI / ReDoc pages that render it.

use axum::Router;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorBody;
use crate::routes::{arxiv, financial_insights, health, root, stock_quote};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Financial Insights API",
        version = "1.0.0",
        description = "API for retrieving financial insights for stocks"
    ),
    paths(
        root::welcome,
        health::health,
        stock_quote::latest_quote,
        stock_quote::daily_adjusted,
        stock_quote::end_of_day,
        financial_insights::financial_insights,
        arxiv::recent_articles,
        arxiv::categories,
    ),
    components(schemas(
        ErrorBody,
        root::Welcome,
        health::Health,
        health::Providers,
        stock_quote::StockQuote,
        stock_quote::DailyAdjusted,
        stock_quote::EndOfDay,
        financial_insights::FinancialInsightsResponse,
        arxiv::ArticleDto,
        arxiv::AuthorDto,
        arxiv::CategoryDto,
        arxiv::CategoryList,
    )),
    tags(
        (name = "general", description = "Service information"),
        (name = "stock_quote", description = "Stock prices from Alpha Vantage, Tiingo and Yahoo Finance"),
        (name = "financial_insights", description = "Fundamentals and sentiment from fin-insight"),
        (name = "arxiv", description = "Recent arXiv submissions"),
    )
)]
pub struct ApiDoc;

/// `/openapi.json`, `/docs` and `/redoc`.
pub fn docs_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
}
