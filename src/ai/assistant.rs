use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use super::prompt::{self, CALL_TO_ACTION_LINK, DISCLAIMER, Prompt};
use crate::catalog::{NewsletterRecord, render};
use crate::core::UpstreamError;
use crate::openai::{CompletionApi, CompletionOptions, Message, Role};

pub const HIGH_DEMAND_MESSAGE: &str = "I apologize, but I'm currently experiencing high demand. Please try again in a few moments.";

pub const GENERIC_ERROR_MESSAGE: &str = "I apologize, but I encountered an error processing your request. Please try again later.";

const NO_CONTEXT: &str = "No matching newsletters.";

/// Sampling temperature for answers
pub const TEMPERATURE: f64 = 0.7;

/// Short answers on the first turn so the first reply comes back
/// fast, longer ones once a conversation is going.
pub fn max_tokens_for(history: &[Message]) -> u32 {
    if history.len() < 2 { 200 } else { 500 }
}

/// Answers questions about the catalog using the completion API
pub struct Assistant {
    api: Arc<dyn CompletionApi>,
}

impl Assistant {
    pub fn new(api: Arc<dyn CompletionApi>) -> Self {
        Self { api }
    }

    /// Build the full prompt: system instructions, the prior
    /// conversation as-is, then the question along with the context
    /// records.
    pub fn messages(
        message: &str,
        context: Option<&[&NewsletterRecord]>,
        history: &[Message],
    ) -> Result<Vec<Message>> {
        let templates = prompt::templates();
        let system_msg = templates.render(
            &Prompt::Assistant.to_string(),
            &json!({"disclaimer": DISCLAIMER}),
        )?;
        let context = context
            .map(render)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| NO_CONTEXT.to_string());
        let user_msg = templates.render(
            &Prompt::ContextQuestion.to_string(),
            &json!({"message": message, "context": context}),
        )?;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::new(Role::System, system_msg.trim()));
        messages.extend_from_slice(history);
        messages.push(Message::new(Role::User, user_msg.trim()));
        Ok(messages)
    }

    /// Get an answer for `message`. Never fails: problems with the
    /// API are logged and turned into an apology for the user.
    pub async fn complete(
        &self,
        message: &str,
        context: Option<&[&NewsletterRecord]>,
        history: &[Message],
    ) -> String {
        match self.try_complete(message, context, history).await {
            Ok(reply) => with_disclaimer(reply),
            Err(e) => {
                tracing::error!("Error answering question: {}", e);
                let rate_limited = e
                    .downcast_ref::<UpstreamError>()
                    .is_some_and(UpstreamError::is_rate_limit);
                if rate_limited {
                    HIGH_DEMAND_MESSAGE.to_string()
                } else {
                    GENERIC_ERROR_MESSAGE.to_string()
                }
            }
        }
    }

    async fn try_complete(
        &self,
        message: &str,
        context: Option<&[&NewsletterRecord]>,
        history: &[Message],
    ) -> Result<String> {
        let messages = Self::messages(message, context, history)?;
        let options = CompletionOptions::new(max_tokens_for(history), TEMPERATURE);
        let reply = self.api.complete(&messages, options).await?;
        Ok(reply)
    }
}

// The model is told to end with the disclaimer but doesn't always
// listen
fn with_disclaimer(reply: String) -> String {
    if reply.contains(CALL_TO_ACTION_LINK) {
        return reply;
    }
    format!("{}\n\n{}", reply.trim_end(), DISCLAIMER)
}
