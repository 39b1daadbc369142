pub mod chat_adapter;
pub mod settings;
pub mod types;

pub use chat_adapter::ChatCompletionsAdapter;
pub use settings::{AiConfig, AiConfigUpdate, AiConfigView, CustomAiConfig, MaskedCustomConfig, ProviderRegistry};
pub use types::{CompletionRequest, LLMResponse, Message, ProviderError};
