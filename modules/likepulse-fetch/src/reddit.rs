use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use likepulse_common::{DiscussionSource, RedditFetch, RedditPost};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const SEARCH_BASE: &str = "https://oauth.reddit.com";

/// Indian-politics subreddits searched for discussion posts.
const SUBREDDITS: &[&str] = &["india", "IndiaSpeaks", "indianews", "IndianPoliticalMemes"];

const POST_LIMIT: usize = 50;

/// Max stored length of a post body; longer selftexts are truncated.
const MAX_TEXT_CHARS: usize = 500;

/// Reddit search using application-only OAuth (client-credentials grant).
pub struct RedditFetcher {
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: String,
    client: reqwest::Client,
}

impl RedditFetcher {
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build Reddit HTTP client");
        Self {
            client_id,
            client_secret,
            user_agent: user_agent.into(),
            client,
        }
    }

    pub fn is_available(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    async fn access_token(&self) -> Result<String> {
        let (id, secret) = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(anyhow!("Reddit credentials not configured")),
        };

        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(id, Some(secret))
            .header("User-Agent", &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("Reddit token request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("Reddit token request failed: {}", response.status()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Invalid Reddit token response")?;
        Ok(token.access_token)
    }

    async fn search_subreddit(
        &self,
        token: &str,
        subreddit: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RedditPost>> {
        let url = format!("{SEARCH_BASE}/r/{subreddit}/search");
        let params = [
            ("q", query.to_string()),
            ("restrict_sr", "1".to_string()),
            ("sort", "relevance".to_string()),
            ("t", "month".to_string()),
            ("limit", limit.to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("User-Agent", &self.user_agent)
            .query(&params)
            .send()
            .await
            .context("Reddit search request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("Reddit search failed: {}", response.status()));
        }

        let listing: Listing = response
            .json()
            .await
            .context("Invalid Reddit search response")?;
        Ok(map_listing(listing, subreddit))
    }
}

#[async_trait]
impl DiscussionSource for RedditFetcher {
    async fn fetch(&self, query: &str) -> RedditFetch {
        if !self.is_available() {
            return RedditFetch::unavailable(
                "Reddit API not configured. Set REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET",
            );
        }

        let token = match self.access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(query, error = %e, "Reddit fetch degraded");
                return RedditFetch::unavailable(format!("Reddit API error: {e}"));
            }
        };

        let per_subreddit = POST_LIMIT / SUBREDDITS.len();
        let mut posts: Vec<RedditPost> = Vec::new();
        let mut errors = Vec::new();

        for subreddit in SUBREDDITS {
            match self
                .search_subreddit(&token, subreddit, query, per_subreddit)
                .await
            {
                Ok(found) => posts.extend(found),
                Err(e) => errors.push(format!("r/{subreddit}: {e}")),
            }
        }

        // Most popular first
        posts.sort_by(|a, b| b.score.cmp(&a.score));
        let total_results = posts.len() as u64;
        posts.truncate(POST_LIMIT);

        info!(query, posts = posts.len(), "Reddit fetch complete");

        RedditFetch {
            posts,
            total_results,
            error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
        }
    }
}

fn map_listing(listing: Listing, subreddit: &str) -> Vec<RedditPost> {
    listing
        .data
        .children
        .into_iter()
        .map(|child| {
            let post = child.data;
            RedditPost {
                title: post.title,
                text: post.selftext.chars().take(MAX_TEXT_CHARS).collect(),
                subreddit: subreddit.to_string(),
                score: post.score,
                upvote_ratio: post.upvote_ratio,
                num_comments: post.num_comments,
                url: format!("https://reddit.com{}", post.permalink),
                created_utc: post.created_utc as i64,
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: ApiPost,
}

#[derive(Debug, Deserialize)]
struct ApiPost {
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    upvote_ratio: f64,
    #[serde(default)]
    num_comments: u64,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    created_utc: f64,
}
