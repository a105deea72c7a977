//! Analysis orchestration: cache check, concurrent fetch, sentiment
//! normalization, scoring, and comparison. All collaborators are injected
//! at construction; one Analyzer instance serves the whole process.

use std::sync::Arc;

use tracing::info;

use likepulse_common::{
    ComparisonResult, DiscussionSource, FeedSource, LikabilityResult, LikepulseError, NewsSource,
    SourceSentiment, VideoFetch, VideoSource,
};

use crate::cache::{cache_key, TtlCache};
use crate::comparison;
use crate::scoring::LikabilityScorer;
use crate::sentiment::SentimentAnalyzer;

/// What the shared cache holds. Analyses and comparisons share one store so
/// stats and clear cover everything.
#[derive(Clone)]
pub enum CachedResult {
    Analysis(LikabilityResult),
    Comparison(ComparisonResult),
}

pub struct Analyzer {
    news: Arc<dyn NewsSource>,
    feed: Arc<dyn FeedSource>,
    discussions: Arc<dyn DiscussionSource>,
    videos: Option<Arc<dyn VideoSource>>,
    sentiment: SentimentAnalyzer,
    scorer: LikabilityScorer,
    cache: TtlCache<CachedResult>,
}

impl Analyzer {
    pub fn new(
        news: Arc<dyn NewsSource>,
        feed: Arc<dyn FeedSource>,
        discussions: Arc<dyn DiscussionSource>,
        videos: Option<Arc<dyn VideoSource>>,
        sentiment: SentimentAnalyzer,
        scorer: LikabilityScorer,
        cache_ttl_hours: u64,
    ) -> Self {
        Self {
            news,
            feed,
            discussions,
            videos,
            sentiment,
            scorer,
            cache: TtlCache::new(cache_ttl_hours),
        }
    }

    pub fn cache(&self) -> &TtlCache<CachedResult> {
        &self.cache
    }

    pub fn scorer(&self) -> &LikabilityScorer {
        &self.scorer
    }

    /// Analyze one entity. Serves from cache unless `force_refresh`;
    /// a cache hit is returned with `cached = true`.
    pub async fn analyze(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<LikabilityResult, LikepulseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LikepulseError::Validation(
                "entity name must not be empty".to_string(),
            ));
        }

        let key = cache_key(&["politician", name]);
        if !force_refresh {
            if let Some(CachedResult::Analysis(mut result)) = self.cache.get(&key) {
                info!(name, "Using cached analysis");
                result.cached = true;
                return Ok(result);
            }
        }

        info!(name, "Analyzing");

        let include_videos = self.scorer.profile().includes_youtube();
        let video_fetch = async {
            if !include_videos {
                return VideoFetch::default();
            }
            match &self.videos {
                Some(videos) => videos.fetch(name).await,
                None => VideoFetch::unavailable("YouTube API not configured. Set YOUTUBE_API_KEY"),
            }
        };

        let (news_data, rss_data, reddit_data, video_data) = tokio::join!(
            self.news.fetch(name),
            self.feed.fetch(name),
            self.discussions.fetch(name),
            video_fetch,
        );

        info!(
            name,
            news = news_data.articles.len(),
            rss = rss_data.articles.len(),
            reddit = reddit_data.posts.len(),
            videos = video_data.videos.len(),
            "Collected source data"
        );

        let news_texts: Vec<String> = news_data
            .articles
            .iter()
            .map(|a| format!("{}. {}", a.title, a.description))
            .collect();
        let rss_texts: Vec<String> = rss_data.articles.iter().map(|a| a.title.clone()).collect();
        let reddit_texts: Vec<String> = reddit_data
            .posts
            .iter()
            .map(|p| format!("{}. {}", p.title, p.text))
            .collect();
        let video_texts: Vec<String> = video_data
            .videos
            .iter()
            .map(|v| format!("{}. {}", v.title, v.description))
            .collect();

        let news_sentiment = self.sentiment.analyze(&news_texts, name, "news").await;
        let rss_sentiment = self.sentiment.analyze(&rss_texts, name, "news").await;
        let reddit_sentiment = self.sentiment.analyze(&reddit_texts, name, "reddit").await;
        let youtube_sentiment = if include_videos {
            self.sentiment.analyze(&video_texts, name, "video").await
        } else {
            SourceSentiment::default()
        };

        let mut result = self.scorer.calculate(
            name,
            &news_data,
            &rss_data,
            &reddit_data,
            &video_data,
            &news_sentiment,
            &rss_sentiment,
            &reddit_sentiment,
            &youtube_sentiment,
        );
        result.ai_summary = join_summaries(&news_sentiment, &reddit_sentiment);

        self.cache
            .set(&key, CachedResult::Analysis(result.clone()));

        info!(name, score = result.score, "Analysis complete");
        Ok(result)
    }

    /// Compare two entities, analyzing each (cache-aware) first.
    pub async fn compare(
        &self,
        name1: &str,
        name2: &str,
        force_refresh: bool,
    ) -> Result<ComparisonResult, LikepulseError> {
        let key = cache_key(&["compare", name1, name2]);
        if !force_refresh {
            if let Some(CachedResult::Comparison(comparison)) = self.cache.get(&key) {
                info!(name1, name2, "Using cached comparison");
                return Ok(comparison);
            }
        }

        let result1 = self.analyze(name1, force_refresh).await?;
        let result2 = self.analyze(name2, force_refresh).await?;

        let comparison = comparison::compare(&result1, &result2);
        self.cache
            .set(&key, CachedResult::Comparison(comparison.clone()));

        Ok(comparison)
    }
}

/// Narrative summary assembled from the per-source model summaries, news
/// first. Empty when the news summary is empty.
fn join_summaries(news: &SourceSentiment, reddit: &SourceSentiment) -> String {
    if news.summary.is_empty() {
        return String::new();
    }
    let mut parts = vec![news.summary.clone()];
    if !reddit.summary.is_empty() {
        parts.push(reddit.summary.clone());
    }
    parts.join(" ")
}
