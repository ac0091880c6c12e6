//! Agent module - decision interpretation and orchestration.
//!
//! The orchestrator follows a bounded decide/execute cycle:
//! 1. Build context with the system prompt and tool catalog
//! 2. Ask the model for a decision: a tool call or a final answer
//! 3. Validate/repair the decision, canonicalize arguments, execute the tool
//! 4. Feed the observation back and repeat until a final can be composed

mod agent_loop;
mod canonicalize;
mod catalog;
mod decision;
mod prompt;
mod repair;

use thiserror::Error;

pub use agent_loop::{Agent, AgentOptions};
pub use canonicalize::canonicalize_args;
pub use catalog::{render_catalog_text, tool_descriptors, ToolDescriptor};
pub use decision::{describe_violations, extract_json_object, normalize, parse_decision, Decision};
pub use prompt::build_system_prompt;

/// Everything that can go wrong between raw model text and a completed
/// tool invocation. All variants are recovered inside the orchestration
/// loop; none of them escape to the caller.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No balanced JSON object in the model output.
    #[error("no complete JSON object found: {0}")]
    Extraction(String),

    /// The object violates the decision-format rules.
    #[error("invalid decision shape: {0}")]
    Shape(String),

    /// The decision names a tool that is not in the catalog.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A required canonical argument is still unresolved after fallback.
    #[error("tool {tool} is missing required argument '{arg}'")]
    ArgumentMissing { tool: String, arg: String },

    /// The single allowed repair attempt also failed.
    #[error("repair attempt failed")]
    RepairExhausted,

    /// The tool gateway call failed.
    #[error("tool invocation failed: {0}")]
    ToolInvocation(String),
}
