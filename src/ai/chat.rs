//! Handles a single chat turn from question to answer.

use std::sync::Arc;

use super::assistant::Assistant;
use super::detect::CategoryDetector;
use super::pacer::{TokenPacer, estimate_tokens};
use crate::catalog::{Catalog, render};
use crate::core::{AppConfig, ChatError};
use crate::openai::{CompletionApi, Message, OpenAiClient};

pub struct ChatService {
    catalog: Arc<Catalog>,
    detector: CategoryDetector,
    pacer: TokenPacer,
    assistant: Assistant,
    chunk_size: usize,
}

impl ChatService {
    pub fn new(
        catalog: Arc<Catalog>,
        api: Arc<dyn CompletionApi>,
        pacer: TokenPacer,
        chunk_size: usize,
    ) -> Self {
        Self {
            detector: CategoryDetector::new(Arc::clone(&catalog), Arc::clone(&api)),
            assistant: Assistant::new(api),
            catalog,
            pacer,
            chunk_size,
        }
    }

    /// Wire up the service against the OpenAI API in `config`
    pub fn from_config(config: &AppConfig, catalog: Arc<Catalog>) -> Self {
        let api = Arc::new(OpenAiClient::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.openai_model,
        ));
        Self::new(
            catalog,
            api,
            TokenPacer::new(config.token_rate_limit),
            config.chunk_size,
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pacer(&self) -> &TokenPacer {
        &self.pacer
    }

    /// Answer `message` given the conversation so far. Only an empty
    /// message is an error.
    pub async fn respond(&self, message: &str, history: &[Message]) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::InvalidRequest("message is required".to_string()));
        }

        let category = self.detector.detect(message).await;
        tracing::info!("Detected category: {:?}", category);

        // Only the first chunk is sent to the model
        let chunks = self.catalog.chunk(category.as_deref(), self.chunk_size);
        tracing::info!("Split context into {} chunks", chunks.len());

        let estimated_tokens = estimate_tokens(message)
            + chunks
                .iter()
                .map(|chunk| estimate_tokens(&render(chunk)))
                .sum::<usize>();
        self.pacer.pace(estimated_tokens).await;

        let response = self
            .assistant
            .complete(message, chunks.first().map(Vec::as_slice), history)
            .await;
        self.pacer.record(estimated_tokens);

        Ok(response)
    }
}
