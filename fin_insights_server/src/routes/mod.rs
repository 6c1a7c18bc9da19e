pub mod arxiv;
pub mod financial_insights;
pub mod health;
pub mod root;
pub mod stock_quote;

use axum::routing::{get, MethodRouter};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::cors::cors_layer;
use crate::docs;
use crate::state::SharedState;

/// Registers `handler` at both `/path` and `/path/`.
fn route_both(
    router: Router<SharedState>,
    path: &str,
    handler: MethodRouter<SharedState>,
) -> Router<SharedState> {
    let bare = path.trim_end_matches('/');
    router
        .route(bare, handler.clone())
        .route(&format!("{}/", bare), handler)
}

/// The complete application: API routes, docs, request tracing and CORS.
pub fn router(state: SharedState, cors_origins: &[String]) -> Router {
    let mut api = Router::new().route("/", get(root::welcome));
    for (path, handler) in [
        ("/health", get(health::health)),
        ("/stock_quote", get(stock_quote::latest_quote)),
        ("/stock_quote/daily_adjusted", get(stock_quote::daily_adjusted)),
        ("/stock_quote/eod", get(stock_quote::end_of_day)),
        ("/financial_insights", get(financial_insights::financial_insights)),
        ("/arxiv/recent", get(arxiv::recent_articles)),
        ("/arxiv/categories", get(arxiv::categories)),
    ] {
        api = route_both(api, path, handler);
    }

    api.with_state(state)
        .merge(docs::docs_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}
