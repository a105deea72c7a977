use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use likepulse_common::{NewsArticle, NewsFetch, NewsSource};

const BASE_URL: &str = "https://newsapi.org/v2/everything";

/// Free tier: articles at most one month old, 100 requests/day.
const MAX_DAYS_BACK: i64 = 30;
const MAX_ARTICLES: usize = 50;

/// News search backed by NewsAPI.
pub struct NewsApiFetcher {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl NewsApiFetcher {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: http_client(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_inner(&self, query: &str) -> NewsFetch {
        let Some(api_key) = &self.api_key else {
            return NewsFetch::unavailable("NewsAPI key not configured");
        };

        let from_date = (Utc::now() - chrono::Duration::days(MAX_DAYS_BACK))
            .format("%Y-%m-%d")
            .to_string();

        let params = [
            // Exact phrase match
            ("q", format!("\"{query}\"")),
            ("from", from_date),
            ("sortBy", "relevancy".to_string()),
            ("pageSize", MAX_ARTICLES.to_string()),
            ("language", "en".to_string()),
            ("apiKey", api_key.clone()),
        ];

        let response = match self.client.get(BASE_URL).query(&params).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return NewsFetch::unavailable("NewsAPI request timed out");
            }
            Err(e) => {
                return NewsFetch::unavailable(format!("NewsAPI error: {e}"));
            }
        };

        match response.status().as_u16() {
            200 => match response.json::<ApiResponse>().await {
                Ok(body) => {
                    let fetch = map_response(body);
                    info!(query, articles = fetch.articles.len(), "NewsAPI fetch complete");
                    fetch
                }
                Err(e) => NewsFetch::unavailable(format!("NewsAPI error: {e}")),
            },
            401 => NewsFetch::unavailable("Invalid NewsAPI key"),
            429 => NewsFetch::unavailable("NewsAPI rate limit exceeded (100/day for free tier)"),
            status => NewsFetch::unavailable(format!("NewsAPI error: {status}")),
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiFetcher {
    async fn fetch(&self, query: &str) -> NewsFetch {
        let fetch = self.fetch_inner(query).await;
        if let Some(error) = &fetch.error {
            warn!(query, error, "NewsAPI fetch degraded");
        }
        fetch
    }
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build NewsAPI HTTP client")
}

fn map_response(body: ApiResponse) -> NewsFetch {
    let articles = body
        .articles
        .into_iter()
        .map(|a| NewsArticle {
            title: a.title.unwrap_or_default(),
            description: a.description.unwrap_or_default(),
            source: a
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            url: a.url.unwrap_or_default(),
            published_at: a.published_at.unwrap_or_default(),
        })
        .collect();

    NewsFetch {
        articles,
        total_results: body.total_results,
        error: None,
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
    #[serde(rename = "totalResults", default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    title: Option<String>,
    description: Option<String>,
    source: Option<ApiSource>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSource {
    name: Option<String>,
}
