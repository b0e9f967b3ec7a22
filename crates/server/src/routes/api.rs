use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn chat(Json(input): Json<ChatRequest>) -> Result<Json<ChatResponse>, ApiError> {
    let message = input
        .message
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::BadRequest("message is required".into()))?;
    Ok(Json(ChatResponse { reply: service::chat::reply(&message) }))
}

/// Read-only view of the stored recommendations; there is no write path.
pub async fn recommendations(State(state): State<AppState>) -> Json<Vec<serde_json::Value>> {
    let recs = state.store.read(|s| s.recommendations.clone()).await;
    Json(recs)
}

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}

pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(input): Json<NewsletterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = input
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("email is required".into()))?;

    state.newsletter.subscribe(email).await?;
    Ok(Json(serde_json::json!({ "subscribed": true })))
}
