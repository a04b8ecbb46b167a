use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::chat_turn::ChatTurn;
use crate::services::prompt_service::StructuredPrompt;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no choices")]
    EmptyResponse,
}

/// A hosted chat model producing one non-streaming completion per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &StructuredPrompt) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionContent,
}

#[derive(Deserialize)]
struct CompletionContent {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint (Groq,
/// OpenAI).
#[derive(Clone)]
pub struct OpenAiCompatibleChat {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompatibleChat {
    pub fn new(client: Client, api_base: &str, api_key: &str, model: &str) -> Self {
        OpenAiCompatibleChat {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: 0.0,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn to_messages(turns: &[ChatTurn]) -> Vec<CompletionMessage<'_>> {
    turns
        .iter()
        .map(|turn| CompletionMessage { role: turn.actor.chat_role(), content: &turn.message })
        .collect()
}

#[async_trait]
impl ChatModel for OpenAiCompatibleChat {
    async fn complete(&self, prompt: &StructuredPrompt) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: to_messages(&prompt.turns),
            temperature: self.temperature,
            stream: false,
        };
        debug!("Requesting completion from {} with {} message(s)", self.model, request.messages.len());

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(LlmError::EmptyResponse)
    }
}
