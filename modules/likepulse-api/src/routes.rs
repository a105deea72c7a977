use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use likepulse_common::LikepulseError;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// Which integrations are configured (booleans only, no secrets).
pub async fn api_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "anthropic": state.config.has_model(),
        "newsapi": state.config.has_newsapi(),
        "reddit": state.config.has_reddit(),
        "youtube": state.config.has_youtube(),
        "rss": true,
    }))
}

pub async fn api_analyze(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> Response {
    match state.analyzer.analyze(&name, query.refresh).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn api_compare(
    State(state): State<Arc<AppState>>,
    Path((name1, name2)): Path<(String, String)>,
    Query(query): Query<RefreshQuery>,
) -> Response {
    match state.analyzer.compare(&name1, &name2, query.refresh).await {
        Ok(comparison) => Json(comparison).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn api_cache_stats(State(state): State<Arc<AppState>>) -> Response {
    Json(state.analyzer.cache().stats()).into_response()
}

pub async fn api_cache_clear(State(state): State<Arc<AppState>>) -> Response {
    let cleared = state.analyzer.cache().clear();
    Json(json!({ "cleared": cleared })).into_response()
}

fn error_response(error: LikepulseError) -> Response {
    let status = match &error {
        LikepulseError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
