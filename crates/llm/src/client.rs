//! HTTP client for the chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use triage::{ClassificationService, ClassificationServiceError};

use crate::{ApiFlavor, ChatCompletionsConfig, LlmError};

/// Request body for the chat-completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Error body returned by both Azure OpenAI and OpenAI.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat-completions client implementing [`ClassificationService`].
///
/// Sends exactly one request per call; retrying is left to the caller.
pub struct ChatCompletionsClient {
    http: Client,
    config: ChatCompletionsConfig,
}

impl ChatCompletionsClient {
    /// Creates a client for the configured deployment.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the configuration is incomplete, or
    /// [`LlmError::Request`] if the HTTP client cannot be built.
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, LlmError> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Sends a system + user message pair and returns the first choice's
    /// content, trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure, non-success status, or a
    /// response without reply text.
    #[tracing::instrument(skip_all, fields(deployment = %self.config.deployment))]
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: match self.config.flavor {
                ApiFlavor::Azure => None,
                ApiFlavor::OpenAi => Some(self.config.deployment.as_str()),
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let request = self.http.post(self.config.completions_url()).json(&body);
        let request = match self.config.flavor {
            ApiFlavor::Azure => request.header("api-key", &self.config.api_key),
            ApiFlavor::OpenAi => request.bearer_auth(&self.config.api_key),
        };

        tracing::debug!("Sending chat completion request");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(response).await);
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("response contained no reply text".to_string()))?;

        tracing::debug!(reply_len = content.len(), "Received chat completion");
        Ok(content.trim().to_string())
    }
}

async fn status_error(response: Response) -> LlmError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|e| e.error.message)
        .unwrap_or(text);

    tracing::warn!(status = %status, ?retry_after, "Chat completion request rejected");
    LlmError::Status {
        status,
        body,
        retry_after,
    }
}

#[async_trait]
impl ClassificationService for ChatCompletionsClient {
    async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
    ) -> Result<String, ClassificationServiceError> {
        Ok(self.chat(system_instruction, user_instruction).await?)
    }
}
