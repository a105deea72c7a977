//! Likability analysis CLI. JSON results go to stdout so they can be piped
//! (e.g. `likepulse analyze "Modi" | jq '.score'`); progress logging goes to
//! stderr via tracing.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ai_client::Claude;
use likepulse_common::{sources::VideoSource, Config};
use likepulse_engine::{Analyzer, LikabilityScorer, ScoringProfile, SentimentAnalyzer};
use likepulse_fetch::{NewsApiFetcher, RedditFetcher, RssFetcher, YouTubeFetcher};

#[derive(Parser)]
#[command(
    name = "likepulse",
    about = "Analyze politician likability from public data",
    long_about = "Gathers news, RSS, social and video signals about a politician, runs \
                  sentiment analysis, and prints a likability score as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a politician's likability score
    Analyze {
        /// Politician name to analyze
        name: String,
        /// Force refresh, bypass cache
        #[arg(short, long)]
        refresh: bool,
    },
    /// Compare two politicians
    Compare {
        politician1: String,
        politician2: String,
        /// Force refresh, bypass cache
        #[arg(short, long)]
        refresh: bool,
    },
    /// Show cache statistics
    CacheStats,
    /// Clear all cached data
    CacheClear,
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
    // Status to stderr; stdout is reserved for the JSON result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("likepulse=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    if matches!(&cli.command, Command::Analyze { .. } | Command::Compare { .. }) {
        config.log_redacted();
        if !config.has_model() {
            warn!("ANTHROPIC_API_KEY not set; sentiment falls back to keyword matching");
        }
    }

    let analyzer = build_analyzer(&config);

    match cli.command {
        Command::Analyze { name, refresh } => {
            let result = analyzer.analyze(&name, refresh).await?;
            info!(name = result.name.as_str(), score = result.score, "Analysis complete");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Compare {
            politician1,
            politician2,
            refresh,
        } => {
            let comparison = analyzer.compare(&politician1, &politician2, refresh).await?;
            info!(
                winner = comparison.winner.as_str(),
                difference = comparison.score_difference,
                "Comparison complete"
            );
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        Command::CacheStats => {
            println!(
                "{}",
                serde_json::to_string_pretty(&analyzer.cache().stats())?
            );
        }
        Command::CacheClear => {
            let cleared = analyzer.cache().clear();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "cleared_entries": cleared,
                    "status": "success",
                }))?
            );
        }
    }

    Ok(())
}
