//! End-to-end analysis flow over stub sources: fetch, keyword sentiment,
//! scoring, caching, and comparison — no network, no model.

use std::sync::Arc;

use async_trait::async_trait;

use likepulse_common::{
    DiscussionSource, FeedSource, NewsArticle, NewsFetch, NewsSource, RedditFetch,
};
use likepulse_engine::{Analyzer, LikabilityScorer, ScoringProfile, SentimentAnalyzer};

fn article(title: &str) -> NewsArticle {
    NewsArticle {
        title: title.to_string(),
        ..Default::default()
    }
}

/// Name-dependent canned articles: favorable set for Asha Rao, hostile set
/// for Vikram Sen. Keyword classification yields (3,1,1) and (1,3,1).
struct StubNews;

#[async_trait]
impl NewsSource for StubNews {
    async fn fetch(&self, query: &str) -> NewsFetch {
        let articles = if query == "Vikram Sen" {
            vec![
                article("Historic victory for local club praised by Sen"),
                article("Corruption scam allegations deepen"),
                article("Policy failure blamed on leadership"),
                article("Critics call the rollout a disaster"),
                article("Assembly session resumes Monday"),
            ]
        } else {
            vec![
                article("Historic victory in state polls"),
                article("New development projects show progress"),
                article("Supporters praise the great welfare push"),
                article("Opposition alleges scam in tender process"),
                article("Assembly session resumes Monday"),
            ]
        };
        NewsFetch {
            total_results: articles.len() as u64,
            articles,
            error: None,
        }
    }
}

struct EmptyFeed;

#[async_trait]
impl FeedSource for EmptyFeed {
    async fn fetch(&self, _query: &str) -> NewsFetch {
        NewsFetch::default()
    }
}

struct UnconfiguredDiscussions;

#[async_trait]
impl DiscussionSource for UnconfiguredDiscussions {
    async fn fetch(&self, _query: &str) -> RedditFetch {
        RedditFetch::unavailable(
            "Reddit API not configured. Set REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET",
        )
    }
}

fn analyzer() -> Analyzer {
    Analyzer::new(
        Arc::new(StubNews),
        Arc::new(EmptyFeed),
        Arc::new(UnconfiguredDiscussions),
        None,
        SentimentAnalyzer::new(None),
        LikabilityScorer::new(ScoringProfile::ThreeSource),
        24,
    )
}

#[tokio::test]
async fn analyze_scores_breakdown_from_stub_sources() {
    let analyzer = analyzer();
    let result = analyzer.analyze("Asha Rao", false).await.unwrap();

    // Keyword fallback on 5 articles: 3 positive, 1 negative, 1 neutral
    assert_eq!(result.breakdown.news_sentiment, 70.0);
    assert_eq!(result.breakdown.rss_sentiment, 50.0);
    assert_eq!(result.breakdown.reddit_sentiment, 50.0);
    assert!(result.breakdown.youtube_sentiment.is_none());
    assert_eq!(result.breakdown.engagement, 50.0);
    assert_eq!(result.breakdown.trend, 25.0);

    // combined news = mean(70, 50) = 60; trend rescaled (25+100)/2
    let expected: f64 =
        60.0 * 0.40 + 50.0 * 0.35 + 50.0 * 0.15 + ((25.0 + 100.0) / 2.0) * 0.10;
    assert_eq!(result.score, (expected * 10.0).round() / 10.0);
    assert_eq!(result.score, 55.3);

    assert!(!result.cached);
    assert!(result
        .insights
        .contains(&"Favorable news media coverage".to_string()));
    assert!(result
        .insights
        .contains(&"Improving public perception trend".to_string()));
    assert!(result
        .insights
        .contains(&"Key topics: politics, governance".to_string()));
    assert!(result
        .weaknesses
        .contains(&"Limited data available for analysis".to_string()));

    let newsapi = &result.sources["newsapi"];
    assert_eq!(newsapi.items_collected, 5);
    assert_eq!(newsapi.positive_count, 3);
    assert!(newsapi.error.as_deref().unwrap().contains("keyword fallback"));

    let reddit = &result.sources["reddit"];
    assert_eq!(reddit.items_collected, 0);
    assert!(reddit
        .error
        .as_deref()
        .unwrap()
        .contains("Reddit API not configured"));
    assert!(!result.sources.contains_key("youtube"));
}

#[tokio::test]
async fn second_analysis_is_served_from_cache() {
    let analyzer = analyzer();

    let first = analyzer.analyze("Asha Rao", false).await.unwrap();
    assert!(!first.cached);

    let second = analyzer.analyze("Asha Rao", false).await.unwrap();
    assert!(second.cached);
    assert_eq!(second.score, first.score);

    // Key normalization: same entity through different casing/whitespace
    let third = analyzer.analyze("  ASHA RAO ", false).await.unwrap();
    assert!(third.cached);

    // force_refresh bypasses the cache
    let fresh = analyzer.analyze("Asha Rao", true).await.unwrap();
    assert!(!fresh.cached);
}

#[tokio::test]
async fn empty_entity_name_is_rejected() {
    let analyzer = analyzer();
    let result = analyzer.analyze("   ", false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn compare_picks_winner_and_recommends_for_trailer() {
    let analyzer = analyzer();
    let comparison = analyzer.compare("Asha Rao", "Vikram Sen", false).await.unwrap();

    assert_eq!(comparison.winner, "Asha Rao");
    assert_eq!(comparison.politician1.score, 55.3);
    assert_eq!(comparison.politician2.score, 44.8);
    assert_eq!(comparison.score_difference, 10.5);

    assert!(comparison
        .comparison_insights
        .contains(&"Asha Rao leads by 10.5 points".to_string()));
    assert!(comparison
        .comparison_insights
        .contains(&"Asha Rao has better news coverage (+40)".to_string()));

    assert!(comparison
        .recommendations
        .contains(&"Vikram Sen should focus on improving news media presence".to_string()));
    assert!(comparison
        .recommendations
        .iter()
        .any(|r| r.starts_with("Address: ")));

    // Comparison itself is cached
    let again = analyzer.compare("Asha Rao", "Vikram Sen", false).await.unwrap();
    assert_eq!(again.winner, "Asha Rao");
}
