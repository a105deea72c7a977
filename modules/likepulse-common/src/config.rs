use std::env;

use tracing::info;

/// Default Anthropic model for sentiment classification and narrative text.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

/// Application configuration loaded from environment variables.
///
/// Every external integration is optional; a missing key degrades that
/// source to a "not configured" result instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Anthropic (sentiment model + narrative)
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,

    // NewsAPI
    pub newsapi_key: Option<String>,

    // Reddit (application-only OAuth)
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,

    // YouTube Data API
    pub youtube_api_key: Option<String>,

    // Cache
    pub cache_ttl_hours: u64,

    // Scoring profile override ("four_source" / "three_source");
    // unset means: four_source when YouTube is configured, else three_source
    pub scoring_profile: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            newsapi_key: optional_env("NEWSAPI_KEY"),
            reddit_client_id: optional_env("REDDIT_CLIENT_ID"),
            reddit_client_secret: optional_env("REDDIT_CLIENT_SECRET"),
            reddit_user_agent: env::var("REDDIT_USER_AGENT")
                .unwrap_or_else(|_| "likepulse/0.1".to_string()),
            youtube_api_key: optional_env("YOUTUBE_API_KEY"),
            cache_ttl_hours: env::var("CACHE_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            scoring_profile: optional_env("SCORING_PROFILE"),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
        }
    }

    pub fn has_model(&self) -> bool {
        self.anthropic_api_key.is_some()
    }

    pub fn has_newsapi(&self) -> bool {
        self.newsapi_key.is_some()
    }

    pub fn has_reddit(&self) -> bool {
        self.reddit_client_id.is_some() && self.reddit_client_secret.is_some()
    }

    pub fn has_youtube(&self) -> bool {
        self.youtube_api_key.is_some()
    }

    /// Log which integrations are configured without printing secrets.
    pub fn log_redacted(&self) {
        info!(
            anthropic = self.has_model(),
            newsapi = self.has_newsapi(),
            reddit = self.has_reddit(),
            youtube = self.has_youtube(),
            cache_ttl_hours = self.cache_ttl_hours,
            "Configuration loaded"
        );
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
