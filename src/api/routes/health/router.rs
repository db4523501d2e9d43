//! Router for the health API

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

async fn health(State(state): State<SharedState>) -> Json<public::HealthResponse> {
    let catalog = state.chat.catalog();
    let message = if catalog.is_fallback() {
        "Newsletter concierge is running on sample data"
    } else {
        "Newsletter concierge is running"
    };

    Json(public::HealthResponse {
        status: "ok".to_string(),
        message: message.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        newsletters_loaded: Some(catalog.len()),
    })
}

/// Create the health router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(health))
}
