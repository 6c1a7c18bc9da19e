use std::sync::Arc;

use fin_insights_lib::{AppConfig, ArxivClient, FinInsightsError, InsightService, QuoteService};

/// Services shared by every request handler.
pub struct AppState {
    pub quotes: QuoteService,
    pub insights: InsightService,
    pub arxiv: ArxivClient,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Builds the production provider clients from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, FinInsightsError> {
        Ok(Self {
            quotes: QuoteService::from_config(config)?,
            insights: InsightService::new(config.insight.clone()),
            arxiv: ArxivClient::new()?,
        })
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
