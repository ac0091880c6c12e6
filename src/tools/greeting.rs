//! Greeting tool backed by the REST API.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::Tool;

/// Fetch a greeting from the backend's `GET /hello` endpoint.
pub struct SayHello {
    http: reqwest::Client,
    backend_url: String,
}

impl SayHello {
    pub fn new(backend_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Tool for SayHello {
    fn name(&self) -> &str {
        "say_hello"
    }

    fn description(&self) -> &str {
        "Say hello using the REST API."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: &Map<String, Value>) -> anyhow::Result<String> {
        let response = self
            .http
            .get(format!("{}/hello", self.backend_url))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("Backend response missing 'message'"))?;

        Ok(message.to_string())
    }
}
