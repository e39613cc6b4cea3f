use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub num_articles: usize,
}

/// Answers a news question from freshly retrieved articles.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let question = request.query.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    info!("💬 Chat request: {}", question);
    let outcome = state.service.run(question).await?;
    Ok(Json(ChatResponse {
        answer: outcome.answer,
        num_articles: outcome.num_articles,
    }))
}
