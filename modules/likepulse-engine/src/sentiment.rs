//! Two-tier sentiment normalization: a model-backed classifier with a
//! deterministic keyword fallback. `SentimentAnalyzer::analyze` never fails;
//! the worst case is a fallback result whose `error` records why.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::warn;

use ai_client::Claude;
use likepulse_common::{Sentiment, SourceSentiment};

/// Max items submitted to the model in one batch; later items are dropped.
const MAX_BATCH: usize = 25;

/// Max characters of each item included in the prompt.
const MAX_ITEM_CHARS: usize = 200;

/// Fixed confidence reported by the keyword fallback.
const FALLBACK_CONFIDENCE: f64 = 50.0;

const FALLBACK_NOT_CONFIGURED: &str =
    "Using keyword fallback (sentiment model not configured)";

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(
        &self,
        texts: &[String],
        entity: &str,
        source_kind: &str,
    ) -> anyhow::Result<SourceSentiment>;
}

// --- Model-backed classifier ---

const SYSTEM_PROMPT: &str = r#"You are an expert sentiment analyst specializing in Indian politics.
Analyze texts about politicians and report structured results.
Consider:
- Hindi/English mixed content (Hinglish)
- Indian political context and terminology
- Sarcasm and satire common in Indian discourse
- Regional language nuances
- Terms like "ji" (respect), "pappu" (derogatory for Rahul Gandhi), "feku" (derogatory for Modi)"#;

/// What the model reports for a batch of texts.
#[derive(Debug, Deserialize, JsonSchema)]
struct SentimentReport {
    /// Number of positive texts
    positive_count: u32,
    /// Number of negative texts
    negative_count: u32,
    /// Number of neutral texts
    neutral_count: u32,
    overall_sentiment: Sentiment,
    /// 0-100
    confidence: f64,
    /// Up to three dominant topics
    #[serde(default)]
    key_topics: Vec<String>,
    /// One sentence summary of overall sentiment
    #[serde(default)]
    summary: String,
    /// Per-item verdicts, 1-indexed
    #[serde(default)]
    results: Vec<ItemVerdict>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[allow(dead_code)]
struct ItemVerdict {
    index: u32,
    sentiment: Sentiment,
    /// Brief reason
    reason: String,
}

pub struct ModelClassifier {
    claude: Claude,
}

impl ModelClassifier {
    pub fn new(claude: Claude) -> Self {
        Self { claude }
    }

    fn build_prompt(texts: &[String], entity: &str, source_kind: &str) -> String {
        let formatted: Vec<String> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let capped: String = text.chars().take(MAX_ITEM_CHARS).collect();
                format!("{}. \"{}\"", i + 1, capped)
            })
            .collect();

        format!(
            "Analyze the sentiment of these {source_kind} texts about Indian politician \"{entity}\".\n\n\
             TEXTS:\n{}\n\n\
             Count each text as positive, negative, or neutral, give the overall direction \
             with a 0-100 confidence, list up to three key topics, and summarize the overall \
             sentiment in one sentence. Be accurate and consider Indian political context.",
            formatted.join("\n")
        )
    }
}

#[async_trait]
impl SentimentClassifier for ModelClassifier {
    async fn classify(
        &self,
        texts: &[String],
        entity: &str,
        source_kind: &str,
    ) -> anyhow::Result<SourceSentiment> {
        let prompt = Self::build_prompt(texts, entity, source_kind);
        let report: SentimentReport = self.claude.extract(SYSTEM_PROMPT, prompt).await?;

        Ok(SourceSentiment {
            positive_count: report.positive_count,
            negative_count: report.negative_count,
            neutral_count: report.neutral_count,
            overall_sentiment: report.overall_sentiment,
            confidence: Some(report.confidence),
            key_topics: report.key_topics,
            summary: report.summary,
            error: None,
        })
    }
}

// --- Keyword fallback ---

const POSITIVE_WORDS: &[&str] = &[
    "great", "amazing", "good", "excellent", "best", "proud", "support", "love", "victory",
    "success", "progress", "development", "growth", "अच्छा", "शानदार", "बधाई", "जीत", "विकास",
    "प्रगति", "visionary", "leader", "historic", "landmark", "achievement",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "worst", "hate", "fail", "failure", "corrupt", "scam", "disaster", "crisis",
    "problem", "issue", "wrong", "terrible", "pappu", "feku", "jumla", "lies", "false", "fake",
    "बुरा", "घोटाला", "झूठ", "असफल", "भ्रष्ट",
];

/// Rule-based classifier: counts keyword hits per item, labels by majority.
pub struct KeywordClassifier;

impl KeywordClassifier {
    fn classify_item(text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let positive_hits = POSITIVE_WORDS.iter().filter(|w| lowered.contains(*w)).count();
        let negative_hits = NEGATIVE_WORDS.iter().filter(|w| lowered.contains(*w)).count();

        if positive_hits > negative_hits {
            Sentiment::Positive
        } else if negative_hits > positive_hits {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn classify_batch(texts: &[String]) -> SourceSentiment {
        let mut positive_count = 0;
        let mut negative_count = 0;
        let mut neutral_count = 0;

        for text in texts {
            match Self::classify_item(text) {
                Sentiment::Positive => positive_count += 1,
                Sentiment::Negative => negative_count += 1,
                Sentiment::Neutral => neutral_count += 1,
            }
        }

        let overall_sentiment = if positive_count > negative_count {
            Sentiment::Positive
        } else if negative_count > positive_count {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };

        SourceSentiment {
            positive_count,
            negative_count,
            neutral_count,
            overall_sentiment,
            confidence: Some(FALLBACK_CONFIDENCE),
            key_topics: vec!["politics".to_string(), "governance".to_string()],
            summary: format!(
                "Keyword analysis: {positive_count} positive, {negative_count} negative, {neutral_count} neutral"
            ),
            error: None,
        }
    }
}

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(
        &self,
        texts: &[String],
        _entity: &str,
        _source_kind: &str,
    ) -> anyhow::Result<SourceSentiment> {
        Ok(Self::classify_batch(texts))
    }
}

// --- Analyzer with automatic fallback ---

pub struct SentimentAnalyzer {
    primary: Option<Box<dyn SentimentClassifier>>,
}

impl SentimentAnalyzer {
    pub fn new(primary: Option<Box<dyn SentimentClassifier>>) -> Self {
        Self { primary }
    }

    /// Model-backed when a Claude handle is available, keyword-only otherwise.
    pub fn from_model(claude: Option<Claude>) -> Self {
        Self::new(claude.map(|c| Box::new(ModelClassifier::new(c)) as Box<dyn SentimentClassifier>))
    }

    pub fn is_model_backed(&self) -> bool {
        self.primary.is_some()
    }

    /// Normalize a list of texts into sentiment counts. Never fails: an
    /// unavailable or failing primary degrades to the keyword fallback with
    /// the reason recorded in `error`.
    pub async fn analyze(&self, texts: &[String], entity: &str, source_kind: &str) -> SourceSentiment {
        if texts.is_empty() {
            return SourceSentiment {
                summary: "No texts to analyze".to_string(),
                ..Default::default()
            };
        }

        let batch: Vec<String> = texts.iter().take(MAX_BATCH).cloned().collect();

        let Some(primary) = &self.primary else {
            let mut fallback = KeywordClassifier::classify_batch(&batch);
            fallback.error = Some(FALLBACK_NOT_CONFIGURED.to_string());
            return fallback;
        };

        match primary.classify(&batch, entity, source_kind).await {
            Ok(sentiment) => sentiment,
            Err(e) => {
                warn!(entity, source_kind, error = %e, "Sentiment model failed, using keyword fallback");
                let mut fallback = KeywordClassifier::classify_batch(&batch);
                fallback.error = Some(format!("Sentiment model error: {e}"));
                fallback
            }
        }
    }
}
