//! Model gateway abstraction.
//!
//! The orchestration loop only ever talks to the model through the
//! [`ModelGateway`] trait: an ordered list of chat messages in, raw text out.
//! The production implementation is [`OllamaClient`]; tests substitute a
//! scripted fake.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

mod ollama;

pub use ollama::OllamaClient;

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-call options for a model request.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Timeout for this call; a timeout is reported as a gateway failure.
    pub timeout: Duration,

    /// Strongly encourage the model to emit a single JSON object.
    pub force_json: bool,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            force_json: true,
        }
    }
}

/// Errors from a model gateway call.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(String),

    #[error("model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("model returned an empty response")]
    Empty,
}

/// Text-in, text-out chat completion.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send a conversation and return the raw assistant text.
    async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions)
        -> Result<String, ModelError>;
}
