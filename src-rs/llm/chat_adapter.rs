use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use super::settings::AiConfig;
use super::types::{CompletionRequest, LLMResponse, Message, ProviderError};

/// Adapter for OpenAI-compatible `/v1/chat/completions` endpoints.
pub struct ChatCompletionsAdapter {
    cfg: AiConfig,
    client: Client,
}

impl ChatCompletionsAdapter {
    pub fn new(cfg: AiConfig) -> Result<Self, ProviderError> {
        if cfg.api_key.is_empty() {
            return Err(ProviderError::Configuration);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout.max(1)))
            .build()
            .map_err(|err| ProviderError::Unknown(err.to_string()))?;
        Ok(Self { cfg, client })
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    pub async fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let payload = build_payload(&self.cfg.model, &request.messages, request.temperature, request.max_tokens);
        let endpoint = format!("{}/v1/chat/completions", self.cfg.api_base.trim_end_matches('/'));

        let resp = self
            .client
            .post(endpoint)
            .bearer_auth(&self.cfg.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|err| self.classify(err))?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = serde_json::from_str(&body)
            .map_err(|err| ProviderError::Unknown(format!("invalid json from provider: {}", err)))?;
        Ok(LLMResponse {
            content: parse_response(&raw),
        })
    }

    fn classify(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.cfg.timeout)
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ProviderError::Network(err.to_string())
        } else {
            ProviderError::Unknown(err.to_string())
        }
    }
}

fn build_payload(model: &str, messages: &[Message], temperature: f64, max_tokens: u32) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "temperature": temperature,
        "max_tokens": max_tokens,
    })
}

fn parse_response(raw: &Value) -> String {
    raw.get("choices")
        .and_then(|v| v.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_model_and_messages() {
        let payload = build_payload("deepseek-chat", &[Message::system("s"), Message::user("u")], 0.7, 2000);
        assert_eq!(payload["model"], "deepseek-chat");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "u");
        assert_eq!(payload["max_tokens"], 2000);
    }

    #[test]
    fn missing_choices_yield_empty_content() {
        assert_eq!(parse_response(&json!({})), "");
        assert_eq!(
            parse_response(&json!({"choices": [{"message": {"content": "hi"}}]})),
            "hi"
        );
    }

    #[test]
    fn adapter_requires_a_key() {
        let cfg = AiConfig {
            api_base: "http://localhost".to_string(),
            api_key: String::new(),
            model: "m".to_string(),
            timeout: 5,
        };
        assert_eq!(ChatCompletionsAdapter::new(cfg).err(), Some(ProviderError::Configuration));
    }
}
