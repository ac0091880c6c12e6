//! Configuration management for toolpilot.
//!
//! Configuration can be set via environment variables:
//! - `OLLAMA_URL` - Optional. Base URL of the Ollama server. Defaults to `http://127.0.0.1:11434`.
//! - `LLM_MODEL` - Optional. The model identifier to use. Defaults to `llama3.1`.
//! - `LLM_TIMEOUT_SECS` - Optional. Per-call model timeout in seconds. Defaults to `30`.
//! - `MAX_STEPS` - Optional. Maximum orchestration loop steps. Defaults to `5`.
//! - `BACKEND_HOST` / `BACKEND_PORT` - Optional. Bind address of the REST tool
//!   backend. Defaults to `127.0.0.1:8000`.
//! - `GATEWAY_HOST` / `GATEWAY_PORT` - Optional. Bind address of the HTTP tool
//!   gateway. Defaults to `127.0.0.1:8100`.
//! - `TOOL_GATEWAY_URL` - Optional. When set, the orchestrator consumes tools
//!   from a remote HTTP gateway at this URL instead of the in-process registry.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ollama server base URL
    pub ollama_url: String,

    /// Model identifier passed to the model gateway
    pub model: String,

    /// Per-call model timeout
    pub llm_timeout: Duration,

    /// Maximum orchestration loop steps
    pub max_steps: usize,

    /// REST tool backend host
    pub backend_host: String,

    /// REST tool backend port
    pub backend_port: u16,

    /// HTTP tool gateway host
    pub gateway_host: String,

    /// HTTP tool gateway port
    pub gateway_port: u16,

    /// Remote tool gateway URL (None = in-process registry)
    pub tool_gateway_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let ollama_url = std::env::var("OLLAMA_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "llama3.1".to_string());

        let llm_timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("LLM_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        let max_steps = std::env::var("MAX_STEPS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_STEPS".to_string(), format!("{}", e)))?;

        let backend_host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let backend_port = std::env::var("BACKEND_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("BACKEND_PORT".to_string(), format!("{}", e)))?;

        let gateway_host = std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let gateway_port = std::env::var("GATEWAY_PORT")
            .unwrap_or_else(|_| "8100".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("GATEWAY_PORT".to_string(), format!("{}", e)))?;

        let tool_gateway_url = std::env::var("TOOL_GATEWAY_URL").ok();

        Ok(Self {
            ollama_url,
            model,
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            max_steps,
            backend_host,
            backend_port,
            gateway_host,
            gateway_port,
            tool_gateway_url,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(ollama_url: String, model: String) -> Self {
        Self {
            ollama_url,
            model,
            llm_timeout: Duration::from_secs(30),
            max_steps: 5,
            backend_host: "127.0.0.1".to_string(),
            backend_port: 8000,
            gateway_host: "127.0.0.1".to_string(),
            gateway_port: 8100,
            tool_gateway_url: None,
        }
    }

    /// Base URL of the REST tool backend, derived from host/port.
    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.backend_host, self.backend_port)
    }
}
