//! Likability score calculation.
//!
//! Combines per-source sentiment counts, raw engagement metrics, and a trend
//! proxy into one 0-100 composite with a structured breakdown and narrative
//! insights/weaknesses. Pure computation; malformed or missing source data
//! degrades to neutral defaults instead of failing.

use std::collections::BTreeMap;

use chrono::Utc;

use likepulse_common::{
    LikabilityResult, NewsFetch, RedditFetch, RedditPost, ScoreBreakdown, SourceData,
    SourceSentiment, Video, VideoFetch,
};

/// Which sources participate in the composite and with what weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringProfile {
    /// News + Reddit + YouTube + engagement + trend.
    FourSource,
    /// News + Reddit + engagement + trend (no video platform).
    ThreeSource,
}

#[derive(Debug, Clone, Copy)]
struct Weights {
    news: f64,
    reddit: f64,
    youtube: f64,
    engagement: f64,
    trend: f64,
}

impl Weights {
    fn sum(&self) -> f64 {
        self.news + self.reddit + self.youtube + self.engagement + self.trend
    }
}

impl ScoringProfile {
    fn weights(self) -> Weights {
        match self {
            ScoringProfile::FourSource => Weights {
                news: 0.30,
                reddit: 0.25,
                youtube: 0.25,
                engagement: 0.15,
                trend: 0.05,
            },
            ScoringProfile::ThreeSource => Weights {
                news: 0.40,
                reddit: 0.35,
                youtube: 0.0,
                engagement: 0.15,
                trend: 0.10,
            },
        }
    }

    pub fn includes_youtube(self) -> bool {
        matches!(self, ScoringProfile::FourSource)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "four_source" => Some(ScoringProfile::FourSource),
            "three_source" => Some(ScoringProfile::ThreeSource),
            _ => None,
        }
    }
}

pub struct LikabilityScorer {
    profile: ScoringProfile,
    weights: Weights,
}

impl LikabilityScorer {
    /// Panics if the profile's weights do not sum to 1.0 — that is a
    /// configuration bug, not an upstream data problem.
    pub fn new(profile: ScoringProfile) -> Self {
        let weights = profile.weights();
        assert!(
            (weights.sum() - 1.0).abs() < 1e-9,
            "scoring weights must sum to 1.0, got {}",
            weights.sum()
        );
        Self { profile, weights }
    }

    pub fn profile(&self) -> ScoringProfile {
        self.profile
    }

    /// Calculate the full likability result for one entity from fetched data
    /// and normalized per-source sentiment.
    #[allow(clippy::too_many_arguments)]
    pub fn calculate(
        &self,
        name: &str,
        news_data: &NewsFetch,
        rss_data: &NewsFetch,
        reddit_data: &RedditFetch,
        video_data: &VideoFetch,
        news_sentiment: &SourceSentiment,
        rss_sentiment: &SourceSentiment,
        reddit_sentiment: &SourceSentiment,
        youtube_sentiment: &SourceSentiment,
    ) -> LikabilityResult {
        let mut sources = BTreeMap::new();
        sources.insert(
            "newsapi".to_string(),
            source_data(
                "NewsAPI",
                news_data.articles.len(),
                news_sentiment,
                news_data.articles.iter().map(|a| a.title.clone()),
                news_data.error.clone(),
            ),
        );
        sources.insert(
            "rss".to_string(),
            source_data(
                "Google News RSS",
                rss_data.articles.len(),
                rss_sentiment,
                rss_data.articles.iter().map(|a| a.title.clone()),
                rss_data.error.clone(),
            ),
        );
        sources.insert(
            "reddit".to_string(),
            source_data(
                "Reddit",
                reddit_data.posts.len(),
                reddit_sentiment,
                reddit_data.posts.iter().map(|p| p.title.clone()),
                reddit_data.error.clone(),
            ),
        );
        if self.profile.includes_youtube() {
            sources.insert(
                "youtube".to_string(),
                source_data(
                    "YouTube",
                    video_data.videos.len(),
                    youtube_sentiment,
                    video_data.videos.iter().map(|v| v.title.clone()),
                    video_data.error.clone(),
                ),
            );
        }

        let news_score = sentiment_score(news_sentiment);
        let rss_score = sentiment_score(rss_sentiment);
        let reddit_score = sentiment_score(reddit_sentiment);
        let youtube_score = sentiment_score(youtube_sentiment);

        let combined_news = combined_news_score(news_score, rss_score);
        let engagement = engagement_score(&reddit_data.posts, &video_data.videos);

        let trend = match self.profile {
            ScoringProfile::FourSource => {
                trend_score(&[news_sentiment, reddit_sentiment, youtube_sentiment])
            }
            ScoringProfile::ThreeSource => trend_score(&[news_sentiment, reddit_sentiment]),
        };

        let overall = combined_news * self.weights.news
            + reddit_score * self.weights.reddit
            + youtube_score * self.weights.youtube
            + engagement * self.weights.engagement
            // Trend is -100..100; rescale to 0-100 for the composite
            + ((trend + 100.0) / 2.0) * self.weights.trend;

        let breakdown = ScoreBreakdown {
            news_sentiment: round1(news_score),
            reddit_sentiment: round1(reddit_score),
            rss_sentiment: round1(rss_score),
            youtube_sentiment: self
                .profile
                .includes_youtube()
                .then(|| round1(youtube_score)),
            engagement: round1(engagement),
            trend: round1(trend),
        };

        let (insights, weaknesses) =
            strengths_and_weaknesses(&breakdown, &sources, news_sentiment, reddit_sentiment);

        LikabilityResult {
            name: name.to_string(),
            score: round1(overall),
            breakdown,
            sources,
            insights,
            weaknesses,
            ai_summary: String::new(),
            analyzed_at: Utc::now(),
            cached: false,
        }
    }
}

fn source_data(
    source_name: &str,
    items_collected: usize,
    sentiment: &SourceSentiment,
    titles: impl Iterator<Item = String>,
    fetch_error: Option<String>,
) -> SourceData {
    SourceData {
        source_name: source_name.to_string(),
        items_collected,
        positive_count: sentiment.positive_count,
        negative_count: sentiment.negative_count,
        neutral_count: sentiment.neutral_count,
        sample_items: titles.take(5).collect(),
        error: fetch_error.or_else(|| sentiment.error.clone()),
    }
}

/// ((positive - negative) / total + 1) * 50, clamped to 0-100.
/// 50.0 when no items were classified (neutral default).
fn sentiment_score(sentiment: &SourceSentiment) -> f64 {
    let total = sentiment.total();
    if total == 0 {
        return 50.0;
    }
    let raw = (sentiment.positive_count as f64 - sentiment.negative_count as f64) / total as f64;
    ((raw + 1.0) * 50.0).clamp(0.0, 100.0)
}

/// Mean of the two news-like scores, unless both are exactly zero. A score
/// of 0.0 is indistinguishable from "no data" under the formula, so
/// both-zero is treated as no signal and defaults to 50.
fn combined_news_score(news_score: f64, rss_score: f64) -> f64 {
    if news_score > 0.0 || rss_score > 0.0 {
        (news_score + rss_score) / 2.0
    } else {
        50.0
    }
}

/// Engagement 0-100 from raw activity volume. Each metric is scaled by a
/// fixed linear cap, combined by fixed weights, and sources that both
/// contribute are averaged. No activity at all defaults to 50.
fn engagement_score(posts: &[RedditPost], videos: &[Video]) -> f64 {
    if posts.is_empty() && videos.is_empty() {
        return 50.0;
    }

    let mut reddit_score = 0.0;
    if !posts.is_empty() {
        let total_score: i64 = posts.iter().map(|p| p.score).sum();
        let total_comments: u64 = posts.iter().map(|p| p.num_comments).sum();
        let avg_upvote_ratio: f64 =
            posts.iter().map(|p| p.upvote_ratio).sum::<f64>() / posts.len() as f64;

        let post_score = (posts.len() as f64 * 5.0).min(100.0);
        let upvote_score = (total_score as f64 / 10.0).min(100.0);
        let comment_score = (total_comments as f64 / 5.0).min(100.0);
        let ratio_score = avg_upvote_ratio * 100.0;

        reddit_score =
            (post_score * 0.2 + upvote_score * 0.3 + comment_score * 0.2 + ratio_score * 0.3) / 2.0;
    }

    let mut youtube_score = 0.0;
    if !videos.is_empty() {
        let total_views: u64 = videos.iter().map(|v| v.views).sum();
        let total_likes: u64 = videos.iter().map(|v| v.likes).sum();
        let total_comments: u64 = videos.iter().map(|v| v.comments_count).sum();

        let video_score = (videos.len() as f64 * 10.0).min(100.0);
        let views_score = (total_views as f64 / 100_000.0).min(100.0);
        let likes_score = (total_likes as f64 / 10_000.0).min(100.0);
        let comments_score = (total_comments as f64 / 1_000.0).min(100.0);

        youtube_score =
            (video_score * 0.2 + views_score * 0.3 + likes_score * 0.2 + comments_score * 0.3)
                / 2.0;
    }

    let engagement = if !posts.is_empty() && !videos.is_empty() {
        (reddit_score + youtube_score) / 2.0
    } else if !posts.is_empty() {
        reddit_score
    } else {
        youtube_score
    };

    engagement.clamp(0.0, 100.0)
}

/// Trend -100..100: average direction weighted by average confidence across
/// the profile's sentiment sources. An instantaneous proxy from current
/// data quality — not a time series; real trends would need history.
fn trend_score(sentiments: &[&SourceSentiment]) -> f64 {
    if sentiments.is_empty() {
        return 0.0;
    }
    let n = sentiments.len() as f64;
    let avg_confidence = sentiments
        .iter()
        .map(|s| s.confidence.unwrap_or(50.0))
        .sum::<f64>()
        / n;
    let avg_direction = sentiments
        .iter()
        .map(|s| s.overall_sentiment.direction())
        .sum::<f64>()
        / n;

    avg_direction * avg_confidence
}

/// Threshold rules per breakdown field. A field lands in insights or
/// weaknesses, never both.
fn strengths_and_weaknesses(
    breakdown: &ScoreBreakdown,
    sources: &BTreeMap<String, SourceData>,
    news_sentiment: &SourceSentiment,
    reddit_sentiment: &SourceSentiment,
) -> (Vec<String>, Vec<String>) {
    let mut insights = Vec::new();
    let mut weaknesses = Vec::new();

    if breakdown.news_sentiment >= 65.0 {
        insights.push("Favorable news media coverage".to_string());
    } else if breakdown.news_sentiment < 40.0 {
        weaknesses.push("Negative news media portrayal".to_string());
    }

    if breakdown.rss_sentiment >= 65.0 {
        insights.push("Positive trending news".to_string());
    } else if breakdown.rss_sentiment < 40.0 {
        weaknesses.push("Negative trending coverage".to_string());
    }

    if breakdown.reddit_sentiment >= 65.0 {
        insights.push("Strong support on social platforms".to_string());
    } else if breakdown.reddit_sentiment < 40.0 {
        weaknesses.push("Negative social media sentiment".to_string());
    }

    if breakdown.engagement >= 70.0 {
        insights.push("High public engagement and discussion".to_string());
    } else if breakdown.engagement < 35.0 {
        weaknesses.push("Low public engagement".to_string());
    }

    if breakdown.trend > 20.0 {
        insights.push("Improving public perception trend".to_string());
    } else if breakdown.trend < -20.0 {
        weaknesses.push("Declining public perception".to_string());
    }

    let total_items: usize = sources.values().map(|s| s.items_collected).sum();
    if total_items < 10 {
        weaknesses.push("Limited data available for analysis".to_string());
    } else if total_items > 50 {
        insights.push("Comprehensive data coverage".to_string());
    }

    let mut topics: Vec<&str> = Vec::new();
    for topic in news_sentiment
        .key_topics
        .iter()
        .chain(reddit_sentiment.key_topics.iter())
    {
        if !topics.contains(&topic.as_str()) {
            topics.push(topic);
        }
        if topics.len() == 3 {
            break;
        }
    }
    if !topics.is_empty() {
        insights.push(format!("Key topics: {}", topics.join(", ")));
    }

    (insights, weaknesses)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use likepulse_common::Sentiment;

    fn counts(positive: u32, negative: u32, neutral: u32) -> SourceSentiment {
        let overall_sentiment = if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };
        SourceSentiment {
            positive_count: positive,
            negative_count: negative,
            neutral_count: neutral,
            overall_sentiment,
            confidence: Some(50.0),
            ..Default::default()
        }
    }

    #[test]
    fn weights_sum_to_one_for_both_profiles() {
        for profile in [ScoringProfile::FourSource, ScoringProfile::ThreeSource] {
            let sum = profile.weights().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{profile:?} sums to {sum}");
        }
    }

    #[test]
    fn sentiment_score_matches_formula() {
        assert_eq!(sentiment_score(&counts(8, 2, 0)), 80.0);
        assert_eq!(sentiment_score(&counts(3, 1, 1)), 70.0);
        assert_eq!(sentiment_score(&counts(0, 4, 0)), 0.0);
        assert_eq!(sentiment_score(&counts(5, 0, 0)), 100.0);
    }

    #[test]
    fn sentiment_score_zero_total_is_exactly_neutral() {
        assert_eq!(sentiment_score(&SourceSentiment::default()), 50.0);
    }

    #[test]
    fn combined_news_special_cases_both_zero() {
        assert_eq!(combined_news_score(0.0, 0.0), 50.0);
        assert_eq!(combined_news_score(60.0, 40.0), 50.0);
        // One genuine zero still averages
        assert_eq!(combined_news_score(0.0, 60.0), 30.0);
    }

    #[test]
    fn engagement_defaults_to_neutral_without_activity() {
        assert_eq!(engagement_score(&[], &[]), 50.0);
    }

    #[test]
    fn engagement_from_posts_uses_fixed_caps_and_weights() {
        let posts: Vec<RedditPost> = (0..10)
            .map(|_| RedditPost {
                score: 100,
                num_comments: 25,
                upvote_ratio: 0.8,
                ..Default::default()
            })
            .collect();

        // post=50, upvote=100, comment=50, ratio=80
        // (50*0.2 + 100*0.3 + 50*0.2 + 80*0.3) / 2 = 37.0
        assert!((engagement_score(&posts, &[]) - 37.0).abs() < 1e-9);
    }

    #[test]
    fn engagement_averages_both_sources_when_present() {
        let posts = vec![RedditPost {
            score: 1000,
            num_comments: 500,
            upvote_ratio: 1.0,
            ..Default::default()
        }];
        let videos = vec![Video {
            views: 10_000_000,
            likes: 1_000_000,
            comments_count: 100_000,
            ..Default::default()
        }];

        // reddit: (5*0.2 + 100*0.3 + 100*0.2 + 100*0.3) / 2 = 40.5
        // youtube: (10*0.2 + 100*0.3 + 100*0.2 + 100*0.3) / 2 = 41.0
        assert!((engagement_score(&posts, &videos) - 40.75).abs() < 1e-9);
    }

    #[test]
    fn trend_is_direction_times_confidence() {
        let positive = SourceSentiment {
            overall_sentiment: Sentiment::Positive,
            confidence: Some(80.0),
            ..Default::default()
        };
        let negative = SourceSentiment {
            overall_sentiment: Sentiment::Negative,
            confidence: Some(60.0),
            ..Default::default()
        };

        // avg direction 0, avg confidence 70 -> 0
        assert_eq!(trend_score(&[&positive, &negative]), 0.0);
        assert_eq!(trend_score(&[&positive]), 80.0);
        assert_eq!(trend_score(&[&negative]), -60.0);
    }

    #[test]
    fn trend_defaults_missing_confidence_to_fifty() {
        let unscored = SourceSentiment {
            overall_sentiment: Sentiment::Positive,
            confidence: None,
            ..Default::default()
        };
        assert_eq!(trend_score(&[&unscored]), 50.0);
    }

    #[test]
    fn insight_and_weakness_are_mutually_exclusive_per_field() {
        for news in [80.0, 60.0, 30.0] {
            let breakdown = ScoreBreakdown {
                news_sentiment: news,
                reddit_sentiment: 50.0,
                rss_sentiment: 50.0,
                youtube_sentiment: None,
                engagement: 50.0,
                trend: 0.0,
            };
            let (insights, weaknesses) = strengths_and_weaknesses(
                &breakdown,
                &BTreeMap::new(),
                &SourceSentiment::default(),
                &SourceSentiment::default(),
            );
            let has_insight = insights.iter().any(|i| i.contains("news media coverage"));
            let has_weakness = weaknesses.iter().any(|w| w.contains("news media"));
            assert!(!(has_insight && has_weakness));
            match news {
                n if n >= 65.0 => assert!(has_insight),
                n if n < 40.0 => assert!(has_weakness),
                _ => assert!(!has_insight && !has_weakness),
            }
        }
    }

    #[test]
    fn key_topics_deduplicate_and_cap_at_three() {
        let news = SourceSentiment {
            key_topics: vec!["economy".to_string(), "elections".to_string()],
            ..Default::default()
        };
        let reddit = SourceSentiment {
            key_topics: vec![
                "economy".to_string(),
                "farming".to_string(),
                "infrastructure".to_string(),
            ],
            ..Default::default()
        };

        let breakdown = ScoreBreakdown {
            news_sentiment: 50.0,
            reddit_sentiment: 50.0,
            rss_sentiment: 50.0,
            youtube_sentiment: None,
            engagement: 50.0,
            trend: 0.0,
        };
        let (insights, _) =
            strengths_and_weaknesses(&breakdown, &BTreeMap::new(), &news, &reddit);

        let topics_line = insights
            .iter()
            .find(|i| i.starts_with("Key topics:"))
            .unwrap();
        assert_eq!(topics_line, "Key topics: economy, elections, farming");
    }

    #[test]
    fn calculate_three_source_scenario() {
        let scorer = LikabilityScorer::new(ScoringProfile::ThreeSource);

        let news_sentiment = counts(3, 1, 1);
        let rss_sentiment = SourceSentiment::default();
        let reddit_sentiment = SourceSentiment::default();

        let result = scorer.calculate(
            "Test Entity",
            &NewsFetch::default(),
            &NewsFetch::default(),
            &RedditFetch::default(),
            &VideoFetch::default(),
            &news_sentiment,
            &rss_sentiment,
            &reddit_sentiment,
            &SourceSentiment::default(),
        );

        assert_eq!(result.breakdown.news_sentiment, 70.0);
        assert_eq!(result.breakdown.rss_sentiment, 50.0);
        assert_eq!(result.breakdown.reddit_sentiment, 50.0);
        assert!(result.breakdown.youtube_sentiment.is_none());
        assert_eq!(result.breakdown.engagement, 50.0);
        // news: direction +1, confidence 50; reddit: neutral, no confidence
        assert_eq!(result.breakdown.trend, 25.0);

        // combined news = mean(70, 50) = 60
        let expected = round1(
            60.0 * 0.40 + 50.0 * 0.35 + 50.0 * 0.15 + ((25.0 + 100.0) / 2.0) * 0.10,
        );
        assert_eq!(result.score, expected);
        assert!(!result.cached);
        assert!(!result.sources.contains_key("youtube"));
    }

    #[test]
    fn calculate_four_source_includes_youtube() {
        let scorer = LikabilityScorer::new(ScoringProfile::FourSource);
        let result = scorer.calculate(
            "Test Entity",
            &NewsFetch::default(),
            &NewsFetch::default(),
            &RedditFetch::default(),
            &VideoFetch::default(),
            &counts(2, 2, 0),
            &SourceSentiment::default(),
            &counts(1, 3, 0),
            &counts(4, 0, 0),
        );

        assert_eq!(result.breakdown.youtube_sentiment, Some(100.0));
        assert!(result.sources.contains_key("youtube"));
    }

    #[test]
    fn source_errors_prefer_fetch_error_over_sentiment_error() {
        let scorer = LikabilityScorer::new(ScoringProfile::ThreeSource);
        let news_data = NewsFetch::unavailable("NewsAPI key not configured");
        let news_sentiment = SourceSentiment {
            error: Some("fallback in effect".to_string()),
            ..Default::default()
        };

        let result = scorer.calculate(
            "Test Entity",
            &news_data,
            &NewsFetch::default(),
            &RedditFetch::default(),
            &VideoFetch::default(),
            &news_sentiment,
            &SourceSentiment::default(),
            &SourceSentiment::default(),
            &SourceSentiment::default(),
        );

        assert_eq!(
            result.sources["newsapi"].error.as_deref(),
            Some("NewsAPI key not configured")
        );
    }
}
