use async_trait::async_trait;

use crate::types::{NewsFetch, RedditFetch, VideoFetch};

/// Primary news search (keyed API).
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self, query: &str) -> NewsFetch;
}

/// Syndicated headline feed (keyless).
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, query: &str) -> NewsFetch;
}

/// Social discussion posts with engagement metrics.
#[async_trait]
pub trait DiscussionSource: Send + Sync {
    async fn fetch(&self, query: &str) -> RedditFetch;
}

/// Video platform results with view/like/comment totals.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn fetch(&self, query: &str) -> VideoFetch;
}
