//! Router for the chat API

use std::sync::Arc;

use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Answer a question about the newsletter catalog
async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<public::ChatRequest>, JsonRejection>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let Json(payload) = payload?;
    let message = payload.message.unwrap_or_default();
    let history = payload.conversation_history.unwrap_or_default();
    tracing::info!("Received chat message: {}", message);

    let response = state.chat.respond(&message, &history).await?;

    tracing::info!("Successfully processed chat message");
    Ok(Json(public::ChatResponse::new(&response)))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
