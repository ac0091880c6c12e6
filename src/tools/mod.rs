//! Tool gateway abstraction and the in-process tool registry.
//!
//! The orchestration loop consumes tools through the [`ToolGateway`] trait:
//! list the catalog, invoke a named tool, get a text observation back. The
//! default implementation is [`ToolRegistry`], which dispatches to [`Tool`]
//! implementations in-process; [`HttpToolGateway`] consumes the same catalog
//! over HTTP from a `tool-gateway` process.

mod greeting;
mod http;
mod math;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use greeting::SayHello;
pub use http::HttpToolGateway;
pub use math::AddNumbers;

/// Catalog entry for one tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Tool catalog and invocation, as seen by the orchestrator.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// List available tools in catalog order.
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolInfo>>;

    /// Invoke a tool by name; the observation is always text.
    async fn call_tool(&self, name: &str, args: &Map<String, Value>) -> anyhow::Result<String>;
}

/// A single executable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (as exposed to the model).
    fn name(&self) -> &str;

    /// Human-readable description for the catalog.
    fn description(&self) -> &str;

    /// JSON schema describing the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: &Map<String, Value>) -> anyhow::Result<String>;
}

/// In-process registry of tools; insertion order is catalog order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Build the standard registry backed by the REST backend at `backend_url`.
    pub fn standard(backend_url: &str) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AddNumbers::new(backend_url)));
        registry.register(Box::new(SayHello::new(backend_url)));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolGateway for ToolRegistry {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolInfo>> {
        Ok(self
            .tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, args: &Map<String, Value>) -> anyhow::Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        let rendered_args = Value::Object(args.clone());
        tracing::info!(tool = name, args = %rendered_args, "calling tool");
        tool.execute(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registry_lists_in_insertion_order() {
        let registry = ToolRegistry::standard("http://127.0.0.1:8000");
        let tools = registry.list_tools().await.unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["add_numbers", "say_hello"]);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let registry = ToolRegistry::new();
        let err = registry
            .call_tool("nope", &Map::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }
}
