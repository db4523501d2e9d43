//! Serves the browser chat UI

use std::sync::Arc;

use axum::{Router, response::Html, routing::get};

use crate::api::state::AppState;

type SharedState = Arc<AppState>;

const INDEX_HTML: &str = include_str!("../../../../web-ui/index.html");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Create the web router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(index))
}
