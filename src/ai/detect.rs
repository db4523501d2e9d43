use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use super::prompt::{self, Prompt};
use crate::catalog::Catalog;
use crate::openai::{CompletionApi, CompletionOptions, Message, Role};

/// Figures out which catalog category a question is about
pub struct CategoryDetector {
    catalog: Arc<Catalog>,
    api: Arc<dyn CompletionApi>,
}

impl CategoryDetector {
    pub fn new(catalog: Arc<Catalog>, api: Arc<dyn CompletionApi>) -> Self {
        Self { catalog, api }
    }

    /// Returns the first category whose name appears in the query.
    /// Otherwise asks the model to classify it, accepting the answer
    /// only if it's a known category. Failures mean no category.
    pub async fn detect(&self, query: &str) -> Option<String> {
        if let Some(category) = self.keyword_match(query) {
            tracing::info!("Direct keyword match found for category: {}", category);
            return Some(category.to_string());
        }

        match self.classify(query).await {
            Ok(category) => category,
            Err(e) => {
                tracing::error!("Error detecting category: {}", e);
                None
            }
        }
    }

    fn keyword_match(&self, query: &str) -> Option<&str> {
        let query = query.to_lowercase();
        self.catalog
            .categories()
            .iter()
            .find(|category| query.contains(&category.to_lowercase()))
            .map(|category| category.as_str())
    }

    async fn classify(&self, query: &str) -> Result<Option<String>> {
        let categories = self.catalog.categories();
        let system_msg = prompt::templates().render(
            &Prompt::CategoryDetection.to_string(),
            &json!({"categories": categories}),
        )?;
        let messages = vec![
            Message::new(Role::System, system_msg.trim()),
            Message::new(Role::User, query),
        ];

        let reply = self
            .api
            .complete(&messages, CompletionOptions::new(20, 0.2))
            .await?;
        let reply = reply.trim();

        Ok(categories
            .iter()
            .find(|category| category.as_str() == reply)
            .cloned())
    }
}
