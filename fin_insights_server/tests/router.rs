use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use fin_insights::{router, AppState};
use fin_insights_lib::alphavantage_api;
use fin_insights_lib::retry::RetryPolicy;
use fin_insights_lib::{
    ArxivClient, InsightConfig, InsightService, QuoteConfig, QuoteProviders, QuoteService,
    TiingoClient,
};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNUSED_UPSTREAM: &str = "http://127.0.0.1:9";

#[derive(Default)]
struct Upstreams<'a> {
    alpha_vantage: Option<&'a MockServer>,
    tiingo: Option<&'a MockServer>,
    arxiv: Option<&'a MockServer>,
    script: Option<PathBuf>,
    cors_origins: Option<Vec<String>>,
}

fn app(upstreams: Upstreams<'_>) -> Router {
    let quote_config = QuoteConfig {
        retry: RetryPolicy::none(),
        ..QuoteConfig::default()
    };
    let providers = QuoteProviders {
        alpha_vantage: upstreams.alpha_vantage.map(|s| {
            alphavantage_api::Client::with_base_url(&s.uri(), "av-key".to_string()).unwrap()
        }),
        tiingo: upstreams
            .tiingo
            .map(|s| TiingoClient::with_base_url(&s.uri(), "tiingo-key".to_string()).unwrap()),
        yahoo: None,
    };
    let insight_config = InsightConfig {
        script: upstreams.script,
        python: "sh".to_string(),
        ..InsightConfig::default()
    };
    let arxiv_uri = upstreams
        .arxiv
        .map(|s| s.uri())
        .unwrap_or_else(|| UNUSED_UPSTREAM.to_string());

    let state = Arc::new(AppState {
        quotes: QuoteService::new(providers, &quote_config),
        insights: InsightService::with_search_dirs(insight_config, Vec::new()),
        arxiv: ArxivClient::with_base_url(&arxiv_uri).unwrap(),
    });
    let origins = upstreams
        .cors_origins
        .unwrap_or_else(|| vec!["https://localhost:4201".to_string()]);
    router(state, &origins)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn mount_global_quote(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "GLOBAL_QUOTE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn root_welcomes() {
    let (status, body) = get_json(app(Upstreams::default()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to the Financial Insights API!");
}

#[tokio::test]
async fn health_lists_configured_providers() {
    let av = MockServer::start().await;
    let (status, body) = get_json(
        app(Upstreams {
            alpha_vantage: Some(&av),
            ..Upstreams::default()
        }),
        "/health",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["providers"]["alpha_vantage"], true);
    assert_eq!(body["providers"]["tiingo"], false);
    assert_eq!(body["providers"]["yfinance"], false);
    assert_eq!(body["providers"]["fin_insight"], false);
    assert_eq!(body["alpha_vantage_budget"], 5);
}

#[tokio::test]
async fn stock_quote_returns_alpha_vantage_price() {
    let av = MockServer::start().await;
    mount_global_quote(
        &av,
        serde_json::json!({"Global Quote": {
            "01. symbol": "AAPL",
            "05. price": "231.7800",
            "07. latest trading day": "2024-10-18"
        }}),
    )
    .await;

    let (status, body) = get_json(
        app(Upstreams {
            alpha_vantage: Some(&av),
            ..Upstreams::default()
        }),
        "/stock_quote/?ticker=%20aapl%20",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticker"], "aapl");
    assert_eq!(body["latest_price"], "231.7800");
    assert_eq!(body["source"], "alpha_vantage");
    assert_eq!(body["as_of"], "2024-10-18");
}

#[tokio::test]
async fn stock_quote_without_trailing_slash_falls_back_to_tiingo() {
    let av = MockServer::start().await;
    let tiingo = MockServer::start().await;
    mount_global_quote(&av, serde_json::json!({"Global Quote": {}})).await;
    Mock::given(method("GET"))
        .and(path("/iex/"))
        .and(query_param("tickers", "MSFT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "ticker": "MSFT",
            "timestamp": "2024-10-18T16:00:00-04:00",
            "last": 418.0
        }])))
        .mount(&tiingo)
        .await;

    let (status, body) = get_json(
        app(Upstreams {
            alpha_vantage: Some(&av),
            tiingo: Some(&tiingo),
            ..Upstreams::default()
        }),
        "/stock_quote?ticker=MSFT",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["latest_price"], "418.0");
    assert_eq!(body["source"], "tiingo");
}

#[tokio::test]
async fn stock_quote_with_no_price_anywhere_is_na() {
    let av = MockServer::start().await;
    mount_global_quote(&av, serde_json::json!({"Global Quote": {}})).await;

    let (status, body) = get_json(
        app(Upstreams {
            alpha_vantage: Some(&av),
            ..Upstreams::default()
        }),
        "/stock_quote/?ticker=ZZZZ",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticker"], "ZZZZ");
    assert_eq!(body["latest_price"], "N/A");
    assert_eq!(body["source"], Value::Null);
}

#[tokio::test]
async fn stock_quote_input_errors() {
    let av = MockServer::start().await;

    let (status, body) = get_json(
        app(Upstreams {
            alpha_vantage: Some(&av),
            ..Upstreams::default()
        }),
        "/stock_quote/?ticker=%20%20",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Ticker symbol cannot be empty");

    let (status, body) = get_json(app(Upstreams::default()), "/stock_quote/").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("ticker"));

    let (status, _) = get_json(app(Upstreams::default()), "/stock_quote/?ticker=AA%2FPL").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stock_quote_without_alpha_vantage_key_is_500() {
    let (status, body) = get_json(app(Upstreams::default()), "/stock_quote/?ticker=AAPL").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Alpha Vantage API key not found");
}

#[tokio::test]
async fn daily_adjusted_unknown_ticker_is_404() {
    let av = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_DAILY_ADJUSTED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Error Message": "Invalid API call."
        })))
        .mount(&av)
        .await;

    let (status, body) = get_json(
        app(Upstreams {
            alpha_vantage: Some(&av),
            ..Upstreams::default()
        }),
        "/stock_quote/daily_adjusted?ticker=nope",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No daily data found for NOPE");
}

#[tokio::test]
async fn eod_returns_tiingo_close() {
    let tiingo = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tiingo/daily/AAPL/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "date": "2024-10-18T00:00:00.000Z",
            "close": 235.0, "high": 236.18, "low": 234.01, "open": 236.18,
            "volume": 46431472, "adjClose": 234.0
        }])))
        .mount(&tiingo)
        .await;

    let (status, body) = get_json(
        app(Upstreams {
            tiingo: Some(&tiingo),
            ..Upstreams::default()
        }),
        "/stock_quote/eod?ticker=AAPL",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticker"], "AAPL");
    assert_eq!(body["date"], "2024-10-18");
    assert_eq!(body["close"], 235.0);
    assert_eq!(body["adj_close"], 234.0);
}

#[tokio::test]
async fn eod_errors() {
    let (status, body) = get_json(app(Upstreams::default()), "/stock_quote/eod?ticker=AAPL").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Tiingo API key not found");

    let tiingo = MockServer::start().await;
    let (status, _) = get_json(
        app(Upstreams {
            tiingo: Some(&tiingo),
            ..Upstreams::default()
        }),
        "/stock_quote/eod?ticker=AAPL&date=18-10-2024",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn financial_insights_passes_document_through() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("fin_insight.py");
    std::fs::write(
        &script,
        r#"echo "loading $1"
echo '{"latest_price": 187.25, "financialHighlights": {"pe": 29.1}, "income_statement": {"revenue": 1}}'
"#,
    )
    .unwrap();

    let (status, body) = get_json(
        app(Upstreams {
            script: Some(script.clone()),
            ..Upstreams::default()
        }),
        "/financial_insights/?ticker=aapl",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticker"], "AAPL");
    assert_eq!(body["latest_price"], 187.25);
    assert_eq!(body["financialHighlights"]["pe"], 29.1);
    assert_eq!(body["sentiment_summary"], "N/A");
    assert_eq!(body["rating"], "Unknown");
    assert!(body.get("income_statement").is_none());

    let (status, body) = get_json(
        app(Upstreams {
            script: Some(script),
            ..Upstreams::default()
        }),
        "/financial_insights?ticker=AAPL&detailed=true",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["income_statement"]["revenue"], 1);
    assert_eq!(body["balance_sheet"], serde_json::json!({}));
    assert_eq!(body["cash_flow"], serde_json::json!({}));
}

#[tokio::test]
async fn financial_insights_without_script_is_500() {
    let (status, body) = get_json(
        app(Upstreams::default()),
        "/financial_insights/?ticker=AAPL",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "fin-insight package not found in the system");
}

#[tokio::test]
async fn financial_insights_blank_ticker_is_400() {
    let (status, body) = get_json(
        app(Upstreams::default()),
        "/financial_insights/?ticker=",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Ticker symbol cannot be empty");
}

#[tokio::test]
async fn arxiv_recent_maps_articles() {
    let arxiv = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "cat:cs.CL"))
        .and(query_param("max_results", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
                <id>http://arxiv.org/abs/2410.13861v1</id>
                <published>2024-10-17T17:59:58Z</published>
                <updated>2024-10-17T17:59:58Z</updated>
                <title>Language Models</title>
                <summary>Abstract.</summary>
                <author><name>Ada Lovelace</name></author>
                <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.CL"/>
            </entry></feed>"#,
        ))
        .mount(&arxiv)
        .await;

    let (status, body) = get_json(
        app(Upstreams {
            arxiv: Some(&arxiv),
            ..Upstreams::default()
        }),
        "/arxiv/recent?category=cs.CL&limit=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let article = &body[0];
    assert_eq!(article["arxiv_id"], "2410.13861v1");
    assert_eq!(article["authors"][0]["name"], "Ada Lovelace");
    assert_eq!(article["submitted"], "2024-10-17 17:59:58 UTC");
    assert_eq!(article["pdf_url"], "http://arxiv.org/pdf/2410.13861v1");
    assert_eq!(article["primary_category"], "cs.CL");
    assert_eq!(article["summary"], "Abstract.");
}

#[tokio::test]
async fn arxiv_recent_errors() {
    let (status, _) = get_json(app(Upstreams::default()), "/arxiv/recent?limit=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = get_json(app(Upstreams::default()), "/arxiv/recent?limit=51").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let empty = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#),
        )
        .mount(&empty)
        .await;
    let (status, body) = get_json(
        app(Upstreams {
            arxiv: Some(&empty),
            ..Upstreams::default()
        }),
        "/arxiv/recent?category=cs.XX",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No articles found for category: cs.XX");

    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&down)
        .await;
    let (status, body) = get_json(
        app(Upstreams {
            arxiv: Some(&down),
            ..Upstreams::default()
        }),
        "/arxiv/recent",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Failed to fetch articles from arXiv. Please try again later."
    );
}

#[tokio::test]
async fn arxiv_categories_are_static() {
    let (status, body) = get_json(app(Upstreams::default()), "/arxiv/categories").await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 7);
    assert_eq!(categories[0]["id"], "cs.AI");
    assert_eq!(categories[0]["name"], "Artificial Intelligence");
}

#[tokio::test]
async fn openapi_document_describes_routes() {
    let (status, body) = get_json(app(Upstreams::default()), "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Financial Insights API");
    assert_eq!(body["info"]["version"], "1.0.0");
    for path in [
        "/",
        "/health",
        "/stock_quote/",
        "/stock_quote/daily_adjusted",
        "/stock_quote/eod",
        "/financial_insights/",
        "/arxiv/recent",
        "/arxiv/categories",
    ] {
        assert!(body["paths"].get(path).is_some(), "missing {path}");
    }
}

#[tokio::test]
async fn redoc_page_is_served() {
    let response = app(Upstreams::default())
        .oneshot(Request::builder().uri("/redoc").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/stock_quote/")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let response = app(Upstreams::default())
        .oneshot(preflight("https://localhost:4201"))
        .await
        .unwrap();
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://localhost:4201"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn cors_ignores_unknown_origin() {
    let response = app(Upstreams::default())
        .oneshot(preflight("https://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn cors_wildcard_allows_any_origin() {
    let response = app(Upstreams {
        cors_origins: Some(vec!["*".to_string()]),
        ..Upstreams::default()
    })
    .oneshot(preflight("https://anywhere.example"))
    .await
    .unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
