use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::UpstreamError;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

/// A single conversation turn
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Sampling settings sent with each completion request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionOptions {
    pub fn new(max_tokens: u32, temperature: f64) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// The remote text generation capability. Implemented by
/// `OpenAiClient` and by fakes in tests.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<String, UpstreamError>;
}

pub async fn completion(
    messages: &[Message],
    options: CompletionOptions,
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<String, UpstreamError> {
    let payload = json!({
        "model": model,
        "messages": messages,
        "max_tokens": options.max_tokens,
        "temperature": options.temperature,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60))
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_error(status, body));
    }

    let resp: Value = response.json().await?;
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| UpstreamError::Malformed(resp.to_string()))
}

// OpenAI reports throttling with a 429 but some compatible servers
// only put it in the error body, e.g.
// {"error": {"type": "rate_limit_error", "code": "rate_limit_exceeded"}}
fn classify_error(status: StatusCode, body: String) -> UpstreamError {
    let err: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let kind = err["error"]["type"].as_str().unwrap_or_default();
    let code = err["error"]["code"].as_str().unwrap_or_default();

    if status == StatusCode::TOO_MANY_REQUESTS
        || kind.contains("rate_limit")
        || code.contains("rate_limit")
    {
        return UpstreamError::RateLimited(body);
    }

    UpstreamError::Status {
        status: status.as_u16(),
        body,
    }
}

/// Chat completion client for OpenAI compatible APIs
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Send a tiny request to check the credential actually works. If
    /// the API is throttling us, wait out the window and try once
    /// more.
    pub async fn verify(&self) -> Result<(), UpstreamError> {
        self.verify_with_backoff(Duration::from_secs(60)).await
    }

    async fn verify_with_backoff(&self, backoff: Duration) -> Result<(), UpstreamError> {
        let messages = vec![Message::new(Role::User, "Hi")];
        let options = CompletionOptions::new(10, 1.0);

        match self.complete(&messages, options).await {
            Ok(_) => {}
            Err(e) if e.is_rate_limit() => {
                tracing::warn!(
                    "Rate limit hit during API key validation, waiting {} seconds...",
                    backoff.as_secs()
                );
                tokio::time::sleep(backoff).await;
                self.complete(&messages, options).await?;
            }
            Err(e) => return Err(e),
        }

        tracing::info!("OpenAI client initialized and API key validated");
        Ok(())
    }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    async fn complete(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<String, UpstreamError> {
        completion(
            messages,
            options,
            &self.api_hostname,
            &self.api_key,
            &self.model,
        )
        .await
    }
}
