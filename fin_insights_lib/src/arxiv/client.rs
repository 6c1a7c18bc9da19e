//! arXiv export API client.

use std::time::Duration;

use super::atom::parse_feed;
use super::error::ArxivError;
use super::types::Article;

/// Request timeout for arXiv API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    /// Create a new ArxivClient against `https://export.arxiv.org`.
    pub fn new() -> Result<Self, ArxivError> {
        Self::with_base_url("https://export.arxiv.org")
    }

    /// Create a new ArxivClient with custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str) -> Result<Self, ArxivError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The `limit` most recently submitted articles in `category`, newest first.
    pub async fn recent(&self, category: &str, limit: usize) -> Result<Vec<Article>, ArxivError> {
        let url = format!("{}/api/query", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("search_query", format!("cat:{}", category)),
                ("sortBy", "submittedDate".to_string()),
                ("sortOrder", "descending".to_string()),
                ("start", "0".to_string()),
                ("max_results", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("arXiv query for {} failed with status {}", category, status);
            return Err(ArxivError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let mut articles = parse_feed(&body)?;
        articles.truncate(limit);
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed(ids: &[&str]) -> String {
        let entries: String = ids
            .iter()
            .map(|id| {
                format!(
                    "<entry><id>http://arxiv.org/abs/{id}</id><title>Paper {id}</title>\
                     <published>2024-10-17T17:59:58Z</published><updated>2024-10-17T17:59:58Z</updated>\
                     <author><name>A. Author</name></author></entry>"
                )
            })
            .collect();
        format!(r#"<feed xmlns="http://www.w3.org/2005/Atom">{entries}</feed>"#)
    }

    #[tokio::test]
    async fn recent_sends_sorted_category_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/query"))
            .and(query_param("search_query", "cat:cs.AI"))
            .and(query_param("sortBy", "submittedDate"))
            .and(query_param("sortOrder", "descending"))
            .and(query_param("max_results", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(feed(&["2410.00002v1", "2410.00001v1"]))
                    .insert_header("content-type", "application/atom+xml"),
            )
            .mount(&server)
            .await;

        let client = ArxivClient::with_base_url(&server.uri()).unwrap();
        let articles = client.recent("cs.AI", 2).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].arxiv_id, "2410.00002v1");
        assert_eq!(articles[1].title, "Paper 2410.00001v1");
    }

    #[tokio::test]
    async fn empty_feed_is_empty_vec() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed(&[])))
            .mount(&server)
            .await;

        let client = ArxivClient::with_base_url(&server.uri()).unwrap();
        assert!(client.recent("cs.XX", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_error_is_http_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ArxivClient::with_base_url(&server.uri()).unwrap();
        let err = client.recent("cs.AI", 10).await.unwrap_err();
        assert!(matches!(err, ArxivError::HttpStatus(503)));
    }
}
