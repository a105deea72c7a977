use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use likepulse_common::{FeedSource, NewsArticle, NewsFetch};

const BASE_URL: &str = "https://news.google.com/rss/search";

/// Google News RSS search. Keyless, so always available; headlines only.
pub struct RssFetcher {
    client: reqwest::Client,
}

impl RssFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build RSS HTTP client");
        Self { client }
    }

    pub fn is_available(&self) -> bool {
        true
    }

    /// Fetch one language/country edition of the search feed.
    pub async fn fetch_edition(&self, query: &str, language: &str, country: &str) -> NewsFetch {
        let params = [
            ("q", query.to_string()),
            ("hl", format!("{language}-{country}")),
            ("gl", country.to_string()),
            ("ceid", format!("{country}:{language}")),
        ];

        let response = match self.client.get(BASE_URL).query(&params).send().await {
            Ok(response) => response,
            Err(e) => return NewsFetch::unavailable(format!("RSS fetch error: {e}")),
        };

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return NewsFetch::unavailable(format!("RSS fetch error: {e}")),
        };

        let feed = match feed_rs::parser::parse(&bytes[..]) {
            Ok(feed) => feed,
            Err(e) => return NewsFetch::unavailable(format!("RSS parse error: {e}")),
        };

        let articles: Vec<NewsArticle> = feed
            .entries
            .into_iter()
            .map(|entry| {
                let raw_title = entry.title.map(|t| t.content).unwrap_or_default();
                let (title, source) = split_source(&raw_title);
                NewsArticle {
                    title,
                    description: entry.summary.map(|s| s.content).unwrap_or_default(),
                    source,
                    url: entry
                        .links
                        .first()
                        .map(|l| l.href.clone())
                        .unwrap_or_default(),
                    published_at: entry
                        .published
                        .map(|dt| dt.to_rfc3339())
                        .unwrap_or_default(),
                }
            })
            .collect();

        info!(query, language, articles = articles.len(), "RSS fetch complete");

        NewsFetch {
            total_results: articles.len() as u64,
            articles,
            error: None,
        }
    }

    /// Fetch English and Hindi editions and merge them, deduplicating by URL.
    pub async fn fetch_multiple_languages(&self, query: &str) -> NewsFetch {
        let english = self.fetch_edition(query, "en", "IN").await;
        let hindi = self.fetch_edition(query, "hi", "IN").await;

        let merged = merge_editions(english, hindi);
        if let Some(error) = &merged.error {
            warn!(query, error, "RSS fetch degraded");
        }
        merged
    }
}

impl Default for RssFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for RssFetcher {
    async fn fetch(&self, query: &str) -> NewsFetch {
        self.fetch_multiple_languages(query).await
    }
}

/// Google News titles end in " - Source"; split that suffix off.
fn split_source(raw_title: &str) -> (String, String) {
    match raw_title.rsplit_once(" - ") {
        Some((title, source)) => (title.to_string(), source.to_string()),
        None => (raw_title.to_string(), "Unknown".to_string()),
    }
}

fn merge_editions(english: NewsFetch, hindi: NewsFetch) -> NewsFetch {
    let mut seen_urls = HashSet::new();
    let mut articles = Vec::new();
    for article in english
        .articles
        .into_iter()
        .chain(hindi.articles.into_iter())
    {
        if seen_urls.insert(article.url.clone()) {
            articles.push(article);
        }
    }

    let mut errors = Vec::new();
    if let Some(e) = english.error {
        errors.push(format!("English: {e}"));
    }
    if let Some(e) = hindi.error {
        errors.push(format!("Hindi: {e}"));
    }

    NewsFetch {
        total_results: articles.len() as u64,
        articles,
        error: if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, url: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn splits_google_news_source_suffix() {
        let (title, source) = split_source("PM inaugurates metro line - The Indian Express");
        assert_eq!(title, "PM inaugurates metro line");
        assert_eq!(source, "The Indian Express");

        let (title, source) = split_source("Headline without a suffix");
        assert_eq!(title, "Headline without a suffix");
        assert_eq!(source, "Unknown");
    }

    #[test]
    fn merge_dedups_by_url_and_joins_errors() {
        let english = NewsFetch {
            articles: vec![article("a", "https://x/1"), article("b", "https://x/2")],
            total_results: 2,
            error: None,
        };
        let hindi = NewsFetch {
            articles: vec![article("a-hi", "https://x/1"), article("c", "https://x/3")],
            total_results: 2,
            error: Some("parse failed".to_string()),
        };

        let merged = merge_editions(english, hindi);
        assert_eq!(merged.articles.len(), 3);
        assert_eq!(merged.total_results, 3);
        assert_eq!(merged.error.as_deref(), Some("Hindi: parse failed"));
    }

    #[test]
    fn parses_rss_payload() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0"><channel>
              <title>"modi" - Google News</title>
              <item>
                <title>Cabinet clears new rail corridor - Hindustan Times</title>
                <link>https://news.example.com/rail</link>
                <description>Approval came late Tuesday</description>
                <pubDate>Tue, 07 Jul 2026 10:00:00 GMT</pubDate>
              </item>
            </channel></rss>"#;

        let feed = feed_rs::parser::parse(xml.as_bytes()).unwrap();
        assert_eq!(feed.entries.len(), 1);
        let raw = feed.entries[0].title.as_ref().unwrap().content.clone();
        let (title, source) = split_source(&raw);
        assert_eq!(title, "Cabinet clears new rail corridor");
        assert_eq!(source, "Hindustan Times");
    }
}
