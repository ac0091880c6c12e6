//! Tool gateway client speaking the `tool-gateway` HTTP protocol.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ToolGateway, ToolInfo};

/// Remote tool gateway: `GET /tools` for the catalog, `POST /call_tool` to
/// invoke. Observations come back as the `result` field, stringified.
pub struct HttpToolGateway {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ToolsResponse {
    tools: Vec<ToolInfo>,
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    result: Value,
}

impl HttpToolGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ToolGateway for HttpToolGateway {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolInfo>> {
        let response = self
            .http
            .get(format!("{}/tools", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        let body: ToolsResponse = response.json().await?;
        Ok(body.tools)
    }

    async fn call_tool(&self, name: &str, args: &Map<String, Value>) -> anyhow::Result<String> {
        let response = self
            .http
            .post(format!("{}/call_tool", self.base_url))
            .json(&json!({ "name": name, "args": args }))
            .send()
            .await?
            .error_for_status()?;
        let body: CallResponse = response.json().await?;

        // Numeric results arrive as JSON numbers; the core treats all
        // observations as text.
        Ok(match body.result {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }
}
