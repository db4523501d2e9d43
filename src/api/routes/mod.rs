//! API routes module

pub mod chat;
pub mod health;
pub mod web;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Chat route
        .nest("/chat", chat::router())
        // Health check
        .nest("/health", health::router())
        // Browser chat UI
        .merge(web::router())
}
