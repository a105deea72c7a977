//! Chat interface: LLM intent extraction, analysis fan-out, and narrative
//! generation, plus an SSE variant that streams progress events.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Json, Response},
};
use futures::Stream;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use ai_client::Claude;
use likepulse_common::{LikabilityResult, RankingEntry};
use likepulse_engine::comparison;

use crate::AppState;

const INTENT_SYSTEM_PROMPT: &str = r#"You are an assistant that helps analyze Indian politicians' public perception.

Understand the user's intent and extract:
1. action: "analyze" (single politician), "compare" (2 politicians), "multi_compare" (3+), "help", or "chat"
2. politician names mentioned, normalized to full names

Common politicians: Narendra Modi, Rahul Gandhi, Amit Shah, Arvind Kejriwal, Yogi Adityanath, Mamata Banerjee, K.T. Rama Rao, Harish Rao, Revanth Reddy, Chandrababu Naidu, Jagan Mohan Reddy.

Examples:
- "How is Modi doing?" -> analyze ["Narendra Modi"]
- "Compare Rahul and Modi" -> compare ["Rahul Gandhi", "Narendra Modi"]
- "KTR vs Harish Rao vs Revanth" -> multi_compare ["K.T. Rama Rao", "Harish Rao", "Revanth Reddy"]

Also produce a short friendly response acknowledging the request."#;

const NARRATIVE_SYSTEM_PROMPT: &str =
    "You are a helpful political analyst. Be balanced and insightful.";

const HELP_TEXT: &str = r#"I can help you analyze Indian politicians' public perception!

Try asking things like:
- "How is Narendra Modi doing?"
- "Compare Rahul Gandhi and Modi"
- "KTR vs Harish Rao vs Revanth Reddy"

I'll gather data from news sources and social media, then give you a likability score with insights!"#;

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ChatIntent {
    /// One of: analyze, compare, multi_compare, help, chat
    action: String,
    /// Politician names mentioned, normalized to full names
    #[serde(default)]
    politicians: Vec<String>,
    /// Short friendly acknowledgement of the request
    #[serde(default)]
    response: String,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    action: String,
    initial_response: String,
    politicians: Vec<serde_json::Value>,
    final_response: String,
    rankings: Vec<RankingEntry>,
}

#[derive(Debug, Serialize)]
struct ScoreCard {
    name: String,
    score: f64,
    breakdown: CardBreakdown,
    insights: Vec<String>,
    weaknesses: Vec<String>,
    cached: bool,
}

#[derive(Debug, Serialize)]
struct CardBreakdown {
    news: f64,
    rss: f64,
    reddit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    youtube: Option<f64>,
    engagement: f64,
    trend: f64,
}

impl From<&LikabilityResult> for ScoreCard {
    fn from(result: &LikabilityResult) -> Self {
        Self {
            name: result.name.clone(),
            score: result.score,
            breakdown: CardBreakdown {
                news: result.breakdown.news_sentiment,
                rss: result.breakdown.rss_sentiment,
                reddit: result.breakdown.reddit_sentiment,
                youtube: result.breakdown.youtube_sentiment,
                engagement: result.breakdown.engagement,
                trend: result.breakdown.trend,
            },
            insights: result.insights.clone(),
            weaknesses: result.weaknesses.clone(),
            cached: result.cached,
        }
    }
}

async fn understand_intent(claude: Option<&Claude>, message: &str) -> ChatIntent {
    let Some(claude) = claude else {
        // No model: the chat surface can still explain itself
        return ChatIntent {
            action: "help".to_string(),
            politicians: vec![],
            response: String::new(),
        };
    };

    match claude.extract(INTENT_SYSTEM_PROMPT, message).await {
        Ok(intent) => intent,
        Err(e) => {
            warn!(error = %e, "Intent extraction failed");
            ChatIntent {
                action: "chat".to_string(),
                politicians: vec![],
                response: "I had trouble understanding. Could you rephrase?".to_string(),
            }
        }
    }
}

fn format_result_for_context(result: &LikabilityResult) -> String {
    let youtube_line = result
        .breakdown
        .youtube_sentiment
        .map(|score| format!("- YouTube Sentiment: {score}/100\n"))
        .unwrap_or_default();

    format!(
        "Politician: {}\n\
         Overall Likability Score: {}/100\n\n\
         Score Breakdown:\n\
         - News Sentiment: {}/100\n\
         - RSS/Trending News: {}/100\n\
         - Reddit Sentiment: {}/100\n\
         {youtube_line}\
         - Engagement: {}/100\n\
         - Trend Direction: {:+.1}\n\n\
         Strengths: {}\n\
         Weaknesses: {}",
        result.name,
        result.score,
        result.breakdown.news_sentiment,
        result.breakdown.rss_sentiment,
        result.breakdown.reddit_sentiment,
        result.breakdown.engagement,
        result.breakdown.trend,
        join_or_none(&result.insights),
        join_or_none(&result.weaknesses),
    )
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None identified".to_string()
    } else {
        items.join(", ")
    }
}

/// Deterministic sentence used whenever the narrative model is unavailable.
fn fallback_narrative(results: &[LikabilityResult]) -> String {
    if results.len() == 1 {
        let r = &results[0];
        format!("{} has a likability score of {}/100.", r.name, r.score)
    } else {
        let winner = results
            .iter()
            .max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("results must not be empty");
        format!("{} leads with {}/100.", winner.name, winner.score)
    }
}

async fn generate_narrative(
    claude: Option<&Claude>,
    message: &str,
    results: &[LikabilityResult],
) -> String {
    let Some(claude) = claude else {
        return fallback_narrative(results);
    };

    let context: Vec<String> = results.iter().map(format_result_for_context).collect();
    let prompt = format!(
        "Based on this likability analysis, respond to the user's question.\n\n\
         Analysis Data:\n{}\n\n\
         User's question: {message}\n\n\
         Provide a natural, conversational response that summarizes key findings with \
         actual numbers, compares if multiple politicians, and highlights insights. \
         Keep it concise (2-3 paragraphs).",
        context.join("\n\n")
    );

    match claude.chat_completion(NARRATIVE_SYSTEM_PROMPT, prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Narrative generation failed");
            fallback_narrative(results)
        }
    }
}

fn is_analysis_action(action: &str) -> bool {
    matches!(action, "analyze" | "compare" | "multi_compare")
}

pub async fn api_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatMessage>,
) -> Response {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No message provided" })),
        )
            .into_response();
    }

    let intent = understand_intent(state.claude.as_ref(), &message).await;

    let mut reply = ChatReply {
        action: intent.action.clone(),
        initial_response: intent.response.clone(),
        politicians: vec![],
        final_response: String::new(),
        rankings: vec![],
    };

    if is_analysis_action(&intent.action) && !intent.politicians.is_empty() {
        let mut results = Vec::new();
        for name in &intent.politicians {
            match state.analyzer.analyze(name, false).await {
                Ok(result) => {
                    reply
                        .politicians
                        .push(serde_json::to_value(ScoreCard::from(&result)).unwrap_or_default());
                    results.push(result);
                }
                Err(e) => reply
                    .politicians
                    .push(json!({ "name": name, "error": e.to_string() })),
            }
        }

        if !results.is_empty() {
            reply.final_response =
                generate_narrative(state.claude.as_ref(), &message, &results).await;
            reply.rankings = comparison::rank(&results);
        }
    } else if intent.action == "help" {
        reply.final_response = HELP_TEXT.to_string();
    } else {
        reply.final_response = if intent.response.is_empty() {
            "I can help you analyze politicians. Just name one or ask to compare!".to_string()
        } else {
            intent.response.clone()
        };
    }

    Json(reply).into_response()
}

fn sse_json(payload: serde_json::Value) -> Event {
    Event::default().data(payload.to_string())
}

/// Same flow as `api_chat`, streamed as SSE: status events per stage, a
/// score event per politician, the narrative text, rankings, then done.
pub async fn api_chat_stream(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatMessage>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let message = request.message.trim().to_string();

    let stream = async_stream::stream! {
        if message.is_empty() {
            yield Ok(sse_json(json!({"type": "error", "message": "No message provided"})));
            yield Ok(sse_json(json!({"type": "done"})));
            return;
        }

        yield Ok(sse_json(json!({
            "type": "status",
            "message": "Understanding your question..."
        })));

        let intent = understand_intent(state.claude.as_ref(), &message).await;
        yield Ok(sse_json(json!({
            "type": "intent",
            "action": intent.action.clone(),
            "politicians": intent.politicians.clone(),
            "response": intent.response.clone(),
        })));

        if is_analysis_action(&intent.action) && !intent.politicians.is_empty() {
            let mut results = Vec::new();

            for name in &intent.politicians {
                yield Ok(sse_json(json!({
                    "type": "status",
                    "message": format!("Gathering data for {name}...")
                })));

                match state.analyzer.analyze(name, false).await {
                    Ok(result) => {
                        if result.cached {
                            yield Ok(sse_json(json!({
                                "type": "status",
                                "message": format!("Using cached data for {name}...")
                            })));
                        }
                        let card = serde_json::to_value(ScoreCard::from(&result))
                            .unwrap_or_default();
                        yield Ok(sse_json(json!({"type": "score", "politician": card})));
                        results.push(result);
                    }
                    Err(e) => {
                        yield Ok(sse_json(json!({
                            "type": "error",
                            "message": format!("Could not analyze {name}: {e}")
                        })));
                    }
                }
            }

            if !results.is_empty() {
                yield Ok(sse_json(json!({
                    "type": "status",
                    "message": "Generating insights..."
                })));

                let narrative =
                    generate_narrative(state.claude.as_ref(), &message, &results).await;
                yield Ok(sse_json(json!({"type": "text", "content": narrative})));

                if results.len() > 1 {
                    let rankings = comparison::rank(&results);
                    yield Ok(sse_json(json!({
                        "type": "rankings",
                        "data": serde_json::to_value(&rankings).unwrap_or_default(),
                    })));
                }
            }
        } else if intent.action == "help" {
            yield Ok(sse_json(json!({"type": "text", "content": HELP_TEXT})));
        } else {
            let text = if intent.response.is_empty() {
                "I can help you analyze politicians. Just name one or ask to compare!".to_string()
            } else {
                intent.response
            };
            yield Ok(sse_json(json!({"type": "text", "content": text})));
        }

        yield Ok(sse_json(json!({"type": "done"})));
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use likepulse_common::ScoreBreakdown;
    use std::collections::BTreeMap;

    fn result(name: &str, score: f64) -> LikabilityResult {
        LikabilityResult {
            name: name.to_string(),
            score,
            breakdown: ScoreBreakdown {
                news_sentiment: 60.0,
                reddit_sentiment: 50.0,
                rss_sentiment: 55.0,
                youtube_sentiment: None,
                engagement: 45.0,
                trend: 12.5,
            },
            sources: BTreeMap::new(),
            insights: vec!["Favorable news media coverage".to_string()],
            weaknesses: vec![],
            ai_summary: String::new(),
            analyzed_at: chrono::Utc::now(),
            cached: false,
        }
    }

    #[test]
    fn score_card_uses_short_breakdown_keys() {
        let card = ScoreCard::from(&result("Asha Rao", 57.5));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["breakdown"]["news"], 60.0);
        assert!(json["breakdown"].get("youtube").is_none());
        assert_eq!(json["cached"], false);
    }

    #[test]
    fn fallback_narrative_single_and_multi() {
        let single = vec![result("Asha Rao", 57.5)];
        assert_eq!(
            fallback_narrative(&single),
            "Asha Rao has a likability score of 57.5/100."
        );

        let multi = vec![result("Asha Rao", 57.5), result("Vikram Sen", 61.0)];
        assert_eq!(fallback_narrative(&multi), "Vikram Sen leads with 61/100.");
    }

    #[test]
    fn context_includes_trend_sign_and_fallback_labels() {
        let text = format_result_for_context(&result("Asha Rao", 57.5));
        assert!(text.contains("Trend Direction: +12.5"));
        assert!(text.contains("Favorable news media coverage"));
        assert!(text.contains("Weaknesses: None identified"));
    }
}
