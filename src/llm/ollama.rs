//! Ollama-backed model gateway.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ChatMessage, ChatOptions, ModelError, ModelGateway};

/// Model gateway speaking the Ollama `/api/chat` protocol.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    /// Create a client for the given server and model identifier.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ModelGateway for OllamaClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ModelError> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });
        if options.force_json {
            body["format"] = json!("json");
        }

        let response = self
            .http
            .post(self.chat_url())
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(options.timeout)
                } else {
                    ModelError::Request(e.to_string())
                }
            })?;

        let response = response
            .error_for_status()
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let content = parsed.message.content.trim().to_string();
        if content.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(content)
    }
}
