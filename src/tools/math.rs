//! Arithmetic tool backed by the REST API.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::Tool;

/// Add two numbers via the backend's `POST /add` endpoint.
pub struct AddNumbers {
    http: reqwest::Client,
    backend_url: String,
}

impl AddNumbers {
    pub fn new(backend_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Tool for AddNumbers {
    fn name(&self) -> &str {
        "add_numbers"
    }

    fn description(&self) -> &str {
        "Add two numbers using the REST API."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": { "type": "number", "description": "First addend" },
                "b": { "type": "number", "description": "Second addend" }
            },
            "required": ["a", "b"]
        })
    }

    async fn execute(&self, args: &Map<String, Value>) -> anyhow::Result<String> {
        let a = args
            .get("a")
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow::anyhow!("Missing 'a' argument"))?;
        let b = args
            .get("b")
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow::anyhow!("Missing 'b' argument"))?;

        let response = self
            .http
            .post(format!("{}/add", self.backend_url))
            .json(&json!({ "a": a, "b": b }))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let result = body
            .get("result")
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow::anyhow!("Backend response missing 'result'"))?;

        Ok(result.to_string())
    }
}
