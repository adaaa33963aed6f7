//! Blocking chat-completion client for the external text service.
//!
//! # Invariants
//! - One request per call; no retries, no streaming.
//! - The API key is never logged.

use crate::assist::AssistError;
use crate::config::AssistantSettings;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

/// One system+user exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub top_p: Option<f32>,
}

/// Transport seam for the text service.
pub trait ChatClient {
    /// Returns the assistant message content of the first choice.
    fn complete(&self, request: &ChatRequest) -> Result<String, AssistError>;
}

/// OpenAI-compatible `chat/completions` client.
pub struct OpenAiChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    /// Builds a client; fails with `Disabled` when no API key is configured.
    pub fn from_settings(settings: &AssistantSettings) -> Result<Self, AssistError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AssistError::Disabled)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| AssistError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl ChatClient for OpenAiChatClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, AssistError> {
        let started_at = Instant::now();
        let mut body = json!({
            "model": self.model,
            "temperature": 0.0,
            "max_tokens": request.max_tokens,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
        });
        if let Some(top_p) = request.top_p {
            body["top_p"] = json!(top_p);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|err| AssistError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistError::Status(status.as_u16()));
        }

        let parsed: CompletionResponse = response
            .json()
            .map_err(|err| AssistError::InvalidResponse(err.to_string()))?;
        debug!(
            "event=chat_complete module=assist status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AssistError::InvalidResponse("no message content".to_string()))
    }
}
