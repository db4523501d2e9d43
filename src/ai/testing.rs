//! Test doubles for the completion API

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::UpstreamError;
use crate::openai::{CompletionApi, CompletionOptions, Message};

/// Plays back canned replies in order, repeating the last one, and
/// remembers every request. An `Err` reply mentioning `rate_limit`
/// fails as rate limited, any other as a 500.
pub struct FakeApi {
    replies: Mutex<Vec<Result<String, String>>>,
    pub requests: Mutex<Vec<(Vec<Message>, CompletionOptions)>>,
}

impl FakeApi {
    pub fn scripted(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        let replies = replies
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(vec![]),
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Self::scripted(vec![Ok(reply)])
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Self::scripted(vec![Err(reason)])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionApi for FakeApi {
    async fn complete(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<String, UpstreamError> {
        self.requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), options));

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.remove(0)
        } else {
            replies[0].clone()
        };

        reply.map_err(|reason| {
            if reason.contains("rate_limit") {
                UpstreamError::RateLimited(reason)
            } else {
                UpstreamError::Status {
                    status: 500,
                    body: reason,
                }
            }
        })
    }
}
