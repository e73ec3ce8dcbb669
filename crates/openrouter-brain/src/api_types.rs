//! OpenAI-compatible chat-completion request and response types.

use brain_core::{preview, HistoryMessage};
use serde::{Deserialize, Serialize};

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl From<HistoryMessage> for ChatMessage {
    fn from(message: HistoryMessage) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content,
        }
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Chat completion response.
///
/// Only `choices` is required; providers behind OpenRouter are inconsistent
/// about the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response ID
    #[serde(default)]
    pub id: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Response choices
    pub choices: Vec<Choice>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Trimmed content of the first choice, if non-empty.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// A response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The message
    pub message: ResponseMessage,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response message.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Role
    #[serde(default)]
    pub role: Option<String>,
    /// Content (may be null)
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ApiErrorDetails,
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    /// Error message
    pub message: String,
    /// Error code (OpenRouter sends a number, others a string)
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

/// Longest plain-text error body kept for logs.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Best-effort readable message from a non-2xx body (JSON or plain text).
pub fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => api_error.error.message,
        Err(_) => preview(body.trim(), ERROR_BODY_PREVIEW_CHARS),
    }
}
