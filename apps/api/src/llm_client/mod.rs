/// LLM Client — the single point of entry for all OpenAI API calls in SmartMatch.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// All model interactions MUST go through this module.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all evaluation calls.
/// Intentionally hardcoded to keep results comparable across batches.
pub const MODEL: &str = "gpt-4o-mini";
/// Lower temperature for more consistent categorization.
const TEMPERATURE: f32 = 0.3;
/// Per-call ceiling. Expiry surfaces as `LlmError::Http`, an invocation failure.
const CALL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider quota exhausted")]
    QuotaExhausted,

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Quota refusals degrade to a fixed fallback result instead of failing
    /// the request; everything else is an invocation failure.
    pub fn is_quota(&self) -> bool {
        matches!(self, LlmError::QuotaExhausted)
    }
}

/// Abstraction over the chat-completion provider so evaluators can be
/// exercised with a fake model. Carried in `AppState` as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends one system + user message pair and returns the raw text reply.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: Option<String>,
    code: Option<String>,
}

/// The production chat-completion client.
/// No retry: a failed call is reported upward immediately and the batch layer
/// decides whether to continue.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(CALL_TIMEOUT_SECS))
                .build()?,
            api_key,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let chat_response: ChatResponse = response.json().await?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded: {} bytes of content", content.len());
        Ok(content)
    }
}

/// Maps a non-2xx provider reply to an `LlmError`, singling out quota
/// exhaustion so callers can degrade instead of failing.
fn classify_api_error(status: u16, body: &str) -> LlmError {
    if let Ok(parsed) = serde_json::from_str::<OpenAiError>(body) {
        if parsed.error.code.as_deref() == Some("insufficient_quota") {
            return LlmError::QuotaExhausted;
        }
        if let Some(message) = parsed.error.message {
            return LlmError::Api { status, message };
        }
    }
    LlmError::Api {
        status,
        message: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_api_error_detects_quota_code() {
        let body = r#"{"error":{"message":"You exceeded your current quota","code":"insufficient_quota"}}"#;
        assert!(classify_api_error(429, body).is_quota());
    }

    #[test]
    fn test_classify_api_error_keeps_provider_message() {
        let body = r#"{"error":{"message":"model overloaded","code":"server_error"}}"#;
        match classify_api_error(503, body) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_api_error_falls_back_to_raw_body() {
        match classify_api_error(500, "upstream timeout") {
            LlmError::Api { message, .. } => assert_eq!(message, "upstream timeout"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_without_quota_code_is_not_quota() {
        let body = r#"{"error":{"message":"Rate limit reached","code":"rate_limit_exceeded"}}"#;
        assert!(!classify_api_error(429, body).is_quota());
    }
}
