use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LLMResponse {
    pub content: String,
}

/// Failures while talking to the chat-completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("AI API key is not configured; set AI_API_KEY or enable a custom configuration")]
    Configuration,

    #[error("AI API request failed: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("AI API request timed out ({0}s), please retry later")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    #[error("AI analysis failed: {0}")]
    Unknown(String),
}

impl ProviderError {
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::Configuration => "configuration_error",
            ProviderError::Status { .. } => "provider_error",
            ProviderError::Timeout(_) => "timeout_error",
            ProviderError::Network(_) => "network_error",
            ProviderError::Unknown(_) => "unknown_error",
        }
    }
}
