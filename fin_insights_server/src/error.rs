//! Maps library errors onto HTTP responses with a `{"detail": ...}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fin_insights_lib::FinInsightsError;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Ticker symbol cannot be empty")]
    pub detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl From<FinInsightsError> for ApiError {
    fn from(err: FinInsightsError) -> Self {
        match err {
            FinInsightsError::InvalidInput(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            FinInsightsError::NotFound(msg) => Self::not_found(msg),
            FinInsightsError::RateLimited(_) => {
                tracing::warn!("{}", err);
                Self::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            other => {
                tracing::error!("{}", other);
                Self::internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
