//! Anthropic Messages API client used for sentiment classification and
//! narrative generation.
//!
//! Two entry points: [`Claude::chat_completion`] for free text and
//! [`Claude::extract`] for structured output. Extraction forces a single
//! tool call whose input schema is derived from the target type, so a
//! well-formed response deserializes directly into `T`.

mod wire;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::debug;

use wire::{ChatRequest, ChatResponse, ToolDefinition, WireMessage};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow!("ANTHROPIC_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/messages", self.base_url);

        debug!(model = %request.model, "Claude chat request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Claude API error ({status}): {error_text}"));
        }

        Ok(response.json().await?)
    }

    /// Force a tool call shaped by `T`'s JSON schema and deserialize its input.
    pub async fn extract<T: DeserializeOwned + JsonSchema>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let schema = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();

        let request = ChatRequest::new(&self.model)
            .system(system_prompt)
            .message(WireMessage::user(user_prompt))
            .max_tokens(1500)
            .temperature(0.3)
            .forced_tool(ToolDefinition {
                name: "structured_response".to_string(),
                description: "Report the structured result of the analysis.".to_string(),
                input_schema: serde_json::to_value(schema)?,
            });

        let response = self.chat(&request).await?;

        let input = response
            .tool_input()
            .ok_or_else(|| anyhow!("No structured output in Claude response"))?;

        serde_json::from_value(input.clone())
            .map_err(|e| anyhow!("Failed to deserialize structured response: {e}"))
    }

    /// Plain text completion, tuned for conversational narrative.
    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .system(system)
            .message(WireMessage::user(user))
            .max_tokens(1024)
            .temperature(0.7);

        let response = self.chat(&request).await?;

        response
            .text()
            .ok_or_else(|| anyhow!("No text in Claude response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_model_and_key() {
        let ai = Claude::new("sk-ant-test", "claude-haiku-4-5-20251001");
        assert_eq!(ai.model(), "claude-haiku-4-5-20251001");
        assert_eq!(ai.api_key, "sk-ant-test");
        assert_eq!(ai.base_url, ANTHROPIC_API_URL);
    }

    #[test]
    fn base_url_override() {
        let ai = Claude::new("sk-ant-test", "claude-haiku-4-5-20251001")
            .with_base_url("http://localhost:8080");
        assert_eq!(ai.base_url, "http://localhost:8080");
    }
}
