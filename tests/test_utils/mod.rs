//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{Router, body::Body};

use concierge::ai::{ChatService, TokenPacer};
use concierge::api::{AppState, app};
use concierge::catalog::{Catalog, NewsletterRecord};
use concierge::openai::OpenAiClient;

pub const TEST_API_KEY: &str = "sk-test-key";

/// A small catalog with one category that only the model can detect
/// from a loosely worded question.
pub fn test_catalog() -> Catalog {
    Catalog::from_records(vec![
        NewsletterRecord::new([
            ("Name", "Byte Sized"),
            ("Category", "Technology"),
            ("Subscribers", "120000"),
            ("Price", "$1500"),
            ("Description", "Daily software news"),
        ]),
        NewsletterRecord::new([
            ("Name", "Green Ledger"),
            ("Category", "Finance & Investing"),
            ("Subscribers", "45000"),
            ("Price", "$700"),
            ("Description", "Stocks and personal money"),
        ]),
    ])
}

/// Creates a test application router whose completion API calls go
/// to `api_hostname`, usually a `mockito` server.
pub fn test_app(api_hostname: &str) -> Router {
    let api = Arc::new(OpenAiClient::new(api_hostname, TEST_API_KEY, "gpt-3.5-turbo"));
    let chat = ChatService::new(Arc::new(test_catalog()), api, TokenPacer::new(20_000), 20);
    app(Arc::new(AppState::new(chat)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// JSON body the completion API would send back with `content`
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
