use axum::extract::State;
use axum::Json;
use fin_insights_lib::arxiv::{self, Article};
use fin_insights_lib::validation::{validate_category, MAX_ARTICLE_LIMIT};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ErrorBody};
use crate::extract::ValidQuery;
use crate::state::SharedState;

fn default_category() -> String {
    "cs.AI".to_string()
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// arXiv category, e.g. `cs.AI` or `cs.CL`.
    #[serde(default = "default_category")]
    #[param(default = "cs.AI")]
    pub category: String,
    /// Number of articles to return.
    #[serde(default = "default_limit")]
    #[param(default = 10, minimum = 1, maximum = 50)]
    pub limit: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorDto {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleDto {
    pub title: String,
    pub authors: Vec<AuthorDto>,
    #[schema(example = "2024-10-17 17:59:58 UTC")]
    pub submitted: String,
    pub updated: String,
    #[schema(example = "2410.13861v1")]
    pub arxiv_id: String,
    pub abstract_url: String,
    pub pdf_url: String,
    pub primary_category: String,
    pub summary: Option<String>,
}

impl From<Article> for ArticleDto {
    fn from(a: Article) -> Self {
        Self {
            title: a.title,
            authors: a
                .authors
                .into_iter()
                .map(|author| AuthorDto { name: author.name })
                .collect(),
            submitted: a.submitted,
            updated: a.updated,
            arxiv_id: a.arxiv_id,
            abstract_url: a.abstract_url,
            pdf_url: a.pdf_url,
            primary_category: a.primary_category,
            summary: a.summary,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDto {
    #[schema(example = "cs.AI")]
    pub id: String,
    #[schema(example = "Artificial Intelligence")]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub categories: Vec<CategoryDto>,
}

#[utoipa::path(
    get,
    path = "/arxiv/recent",
    tag = "arxiv",
    params(RecentQuery),
    responses(
        (status = 200, description = "Newest submissions first", body = Vec<ArticleDto>),
        (status = 404, description = "No articles in the category", body = ErrorBody),
        (status = 422, description = "Limit out of range", body = ErrorBody),
        (status = 500, description = "arXiv request failed", body = ErrorBody),
    )
)]
pub async fn recent_articles(
    State(state): State<SharedState>,
    ValidQuery(query): ValidQuery<RecentQuery>,
) -> Result<Json<Vec<ArticleDto>>, ApiError> {
    if query.limit == 0 || query.limit > MAX_ARTICLE_LIMIT {
        return Err(ApiError::unprocessable(format!(
            "limit must be between 1 and {}",
            MAX_ARTICLE_LIMIT
        )));
    }
    let category = validate_category(&query.category)?;

    let articles = state
        .arxiv
        .recent(&category, query.limit)
        .await
        .map_err(|e| {
            tracing::error!("Error fetching arXiv articles: {}", e);
            ApiError::internal("Failed to fetch articles from arXiv. Please try again later.")
        })?;

    if articles.is_empty() {
        return Err(ApiError::not_found(format!(
            "No articles found for category: {}",
            category
        )));
    }

    Ok(Json(articles.into_iter().map(ArticleDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/arxiv/categories",
    tag = "arxiv",
    responses((status = 200, description = "Common arXiv categories", body = CategoryList))
)]
pub async fn categories() -> Json<CategoryList> {
    Json(CategoryList {
        categories: arxiv::categories()
            .into_iter()
            .map(|c| CategoryDto {
                id: c.id.to_string(),
                name: c.name.to_string(),
            })
            .collect(),
    })
}
