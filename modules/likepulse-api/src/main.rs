use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Claude;
use likepulse_common::{sources::VideoSource, Config};
use likepulse_engine::{Analyzer, LikabilityScorer, ScoringProfile, SentimentAnalyzer};
use likepulse_fetch::{NewsApiFetcher, RedditFetcher, RssFetcher, YouTubeFetcher};

mod chat;
mod routes;

pub struct AppState {
    pub analyzer: Analyzer,
    pub claude: Option<Claude>,
    pub config: Config,
}

fn scoring_profile(config: &Config) -> ScoringProfile {
    config
        .scoring_profile
        .as_deref()
        .and_then(ScoringProfile::from_name)
        .unwrap_or(if config.has_youtube() {
            ScoringProfile::FourSource
        } else {
            ScoringProfile::ThreeSource
        })
}

fn build_analyzer(config: &Config) -> Analyzer {
    let claude = config
        .anthropic_api_key
        .as_ref()
        .map(|key| Claude::new(key, &config.anthropic_model));

    let videos = config
        .youtube_api_key
        .clone()
        .map(|key| Arc::new(YouTubeFetcher::new(Some(key))) as Arc<dyn VideoSource>);

    Analyzer::new(
        Arc::new(NewsApiFetcher::new(config.newsapi_key.clone())),
        Arc::new(RssFetcher::new()),
        Arc::new(RedditFetcher::new(
            config.reddit_client_id.clone(),
            config.reddit_client_secret.clone(),
            config.reddit_user_agent.clone(),
        )),
        videos,
        SentimentAnalyzer::from_model(claude),
        LikabilityScorer::new(scoring_profile(config)),
        config.cache_ttl_hours,
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("likepulse=info".parse()?))
        .init();

    let config = Config::from_env();
    config.log_redacted();

    let claude = config
        .anthropic_api_key
        .as_ref()
        .map(|key| Claude::new(key, &config.anthropic_model));

    let state = Arc::new(AppState {
        analyzer: build_analyzer(&config),
        claude,
        config: config.clone(),
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Direct query API
        .route("/api/config", get(routes::api_config))
        .route("/api/analyze/{name}", get(routes::api_analyze))
        .route("/api/compare/{name1}/{name2}", get(routes::api_compare))
        .route("/api/cache/stats", get(routes::api_cache_stats))
        .route("/api/cache/clear", post(routes::api_cache_clear))
        // Chat interface
        .route("/api/chat", post(chat::api_chat))
        .route("/api/chat/stream", post(chat::api_chat_stream))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Likepulse API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
