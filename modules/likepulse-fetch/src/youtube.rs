use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use likepulse_common::{Video, VideoFetch, VideoSource};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

const MAX_RESULTS: usize = 10;
const MAX_DESCRIPTION_CHARS: usize = 500;

/// Video search backed by the YouTube Data API v3: one `search.list` call,
/// then a `videos.list` call to join view/like/comment statistics.
pub struct YouTubeFetcher {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl YouTubeFetcher {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build YouTube HTTP client");
        Self { api_key, client }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, api_key: &str, query: &str) -> Result<Vec<Video>> {
        let params = [
            ("part", "snippet".to_string()),
            ("q", format!("{query} India politics")),
            ("type", "video".to_string()),
            ("maxResults", MAX_RESULTS.to_string()),
            ("order", "viewCount".to_string()),
            ("relevanceLanguage", "en".to_string()),
            ("regionCode", "IN".to_string()),
            ("key", api_key.to_string()),
        ];

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&params)
            .send()
            .await
            .context("YouTube search request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("YouTube API error: {}", response.status()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Invalid YouTube search response")?;
        Ok(map_search(body))
    }

    async fn join_statistics(&self, api_key: &str, videos: &mut [Video]) -> Result<()> {
        let ids: Vec<&str> = videos.iter().map(|v| v.video_id.as_str()).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let params = [
            ("part", "statistics".to_string()),
            ("id", ids.join(",")),
            ("key", api_key.to_string()),
        ];

        let response = self
            .client
            .get(VIDEOS_URL)
            .query(&params)
            .send()
            .await
            .context("YouTube statistics request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("YouTube API error: {}", response.status()));
        }

        let body: StatsResponse = response
            .json()
            .await
            .context("Invalid YouTube statistics response")?;

        let stats: HashMap<String, ApiStatistics> = body
            .items
            .into_iter()
            .map(|item| (item.id, item.statistics))
            .collect();

        for video in videos.iter_mut() {
            if let Some(s) = stats.get(&video.video_id) {
                video.views = parse_count(&s.view_count);
                video.likes = parse_count(&s.like_count);
                video.comments_count = parse_count(&s.comment_count);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl VideoSource for YouTubeFetcher {
    async fn fetch(&self, query: &str) -> VideoFetch {
        let Some(api_key) = self.api_key.clone() else {
            return VideoFetch::unavailable("YouTube API not configured. Set YOUTUBE_API_KEY");
        };

        let mut videos = match self.search(&api_key, query).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!(query, error = %e, "YouTube fetch degraded");
                return VideoFetch::unavailable(format!("{e}"));
            }
        };

        if let Err(e) = self.join_statistics(&api_key, &mut videos).await {
            // Search succeeded; report the statistics gap but keep the videos.
            warn!(query, error = %e, "YouTube statistics join failed");
            videos.sort_by(|a, b| b.views.cmp(&a.views));
            return VideoFetch {
                videos,
                error: Some(format!("{e}")),
            };
        }

        videos.sort_by(|a, b| b.views.cmp(&a.views));

        info!(query, videos = videos.len(), "YouTube fetch complete");

        VideoFetch {
            videos,
            error: None,
        }
    }
}

fn map_search(body: SearchResponse) -> Vec<Video> {
    body.items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let snippet = item.snippet?;
            Some(Video {
                url: format!("https://www.youtube.com/watch?v={video_id}"),
                video_id,
                title: snippet.title,
                description: snippet
                    .description
                    .chars()
                    .take(MAX_DESCRIPTION_CHARS)
                    .collect(),
                channel: snippet.channel_title,
                published_at: snippet.published_at,
                views: 0,
                likes: 0,
                comments_count: 0,
            })
        })
        .collect()
}

/// The Data API returns statistics counters as strings.
fn parse_count(raw: &Option<String>) -> u64 {
    raw.as_deref()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    items: Vec<StatsItem>,
}

#[derive(Debug, Deserialize)]
struct StatsItem {
    id: String,
    #[serde(default)]
    statistics: ApiStatistics,
}

#[derive(Debug, Default, Deserialize)]
struct ApiStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}
