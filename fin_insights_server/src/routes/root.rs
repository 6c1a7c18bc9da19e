use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Welcome {
    #[schema(example = "Welcome to the Financial Insights API!")]
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "general",
    responses((status = 200, description = "Greeting", body = Welcome))
)]
pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the Financial Insights API!".to_string(),
    })
}
