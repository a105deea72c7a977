use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

// --- Sentiment ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Direction for trend math: positive +1, neutral 0, negative -1.
    pub fn direction(self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Neutral => 0.0,
            Sentiment::Negative => -1.0,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// Normalized sentiment for one source, from the model-backed classifier or
/// the keyword fallback. Counts are never negative; all three zero means
/// "no data" and downstream scoring treats it as a neutral default.
///
/// `error` is diagnostic only — a fallback result still carries counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSentiment {
    pub positive_count: u32,
    pub negative_count: u32,
    pub neutral_count: u32,
    pub overall_sentiment: Sentiment,
    /// 0-100; unset when there was nothing to classify.
    pub confidence: Option<f64>,
    pub key_topics: Vec<String>,
    pub summary: String,
    pub error: Option<String>,
}

impl SourceSentiment {
    pub fn total(&self) -> u32 {
        self.positive_count + self.negative_count + self.neutral_count
    }
}

// --- Fetched items ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedditPost {
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub upvote_ratio: f64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_utc: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments_count: u64,
}

// --- Fetch results ---
//
// Fetchers never fail hard: an unavailable or misbehaving upstream yields an
// empty item list with `error` set, and the pipeline continues.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsFetch {
    pub articles: Vec<NewsArticle>,
    pub total_results: u64,
    pub error: Option<String>,
}

impl NewsFetch {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedditFetch {
    pub posts: Vec<RedditPost>,
    pub total_results: u64,
    pub error: Option<String>,
}

impl RedditFetch {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoFetch {
    pub videos: Vec<Video>,
    pub error: Option<String>,
}

impl VideoFetch {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }
}

// --- Analysis results ---

/// Per-source reporting block inside a LikabilityResult.
///
/// Stores up to 5 sample titles; the JSON projection publishes at most 3.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceData {
    pub source_name: String,
    pub items_collected: usize,
    pub positive_count: u32,
    pub negative_count: u32,
    pub neutral_count: u32,
    #[serde(serialize_with = "first_three")]
    pub sample_items: Vec<String>,
    pub error: Option<String>,
}

impl SourceData {
    /// Sentiment score 0-100 for this source: ((p - n) / total + 1) * 50,
    /// rounded to one decimal. 50.0 when no items were classified.
    pub fn sentiment_score(&self) -> f64 {
        let total = self.positive_count + self.negative_count + self.neutral_count;
        if total == 0 {
            return 50.0;
        }
        let raw = (self.positive_count as f64 - self.negative_count as f64) / total as f64;
        (((raw + 1.0) * 50.0).clamp(0.0, 100.0) * 10.0).round() / 10.0
    }
}

fn first_three<S: Serializer>(items: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    let capped: Vec<&String> = items.iter().take(3).collect();
    capped.serialize(serializer)
}

/// Sub-scores behind an overall likability score. Sentiment fields are
/// 0-100; trend is -100..100. `youtube_sentiment` exists only under the
/// four-source scoring profile and is omitted from JSON otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub news_sentiment: f64,
    pub reddit_sentiment: f64,
    pub rss_sentiment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_sentiment: Option<f64>,
    pub engagement: f64,
    pub trend: f64,
}

/// Complete likability analysis for one entity. Constructed in full once per
/// analysis; `cached` flips to true only when served from the cache store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikabilityResult {
    pub name: String,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub sources: BTreeMap<String, SourceData>,
    pub insights: Vec<String>,
    pub weaknesses: Vec<String>,
    pub ai_summary: String,
    pub analyzed_at: DateTime<Utc>,
    pub cached: bool,
}

/// Pairwise comparison of two already-computed likability results.
/// Derived entirely from the two inputs; never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub politician1: LikabilityResult,
    pub politician2: LikabilityResult,
    pub winner: String,
    pub score_difference: f64,
    pub comparison_insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub ai_analysis: String,
    pub analyzed_at: DateTime<Utc>,
}

/// One row of a multi-way ranking (3+ entities compared).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub name: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_score_formula() {
        let data = SourceData {
            positive_count: 8,
            negative_count: 2,
            neutral_count: 0,
            ..Default::default()
        };
        assert_eq!(data.sentiment_score(), 80.0);
    }

    #[test]
    fn sentiment_score_no_data_is_neutral() {
        let data = SourceData::default();
        assert_eq!(data.sentiment_score(), 50.0);
    }

    #[test]
    fn sentiment_score_all_negative_is_zero() {
        let data = SourceData {
            negative_count: 4,
            ..Default::default()
        };
        assert_eq!(data.sentiment_score(), 0.0);
    }

    #[test]
    fn sample_items_serialize_at_most_three() {
        let data = SourceData {
            source_name: "NewsAPI".to_string(),
            sample_items: (1..=5).map(|i| format!("headline {i}")).collect(),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["sample_items"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn breakdown_omits_youtube_when_absent() {
        let lean = ScoreBreakdown::default();
        let json = serde_json::to_value(&lean).unwrap();
        assert!(json.get("youtube_sentiment").is_none());

        let full = ScoreBreakdown {
            youtube_sentiment: Some(55.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["youtube_sentiment"], 55.0);
    }

    #[test]
    fn sentiment_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Sentiment::Positive).unwrap(),
            "\"positive\""
        );
    }
}
