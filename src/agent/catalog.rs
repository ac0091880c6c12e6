//! Tool catalog rendering for the system prompt.

use crate::tools::ToolInfo;

/// Display entry for one tool: name, call signature, description.
/// Built once from the tool gateway's catalog at session start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub signature: String,
    pub description: String,
}

/// Derive the displayed call signature for a tool. Known tools get a typed
/// signature; anything else falls back to the bare name.
fn signature_for(name: &str) -> String {
    match name {
        "add_numbers" => "add_numbers(a: float, b: float) -> float".to_string(),
        "say_hello" => "say_hello() -> str".to_string(),
        other => other.to_string(),
    }
}

/// Build descriptors from the raw catalog, preserving its order.
pub fn tool_descriptors(tools: &[ToolInfo]) -> Vec<ToolDescriptor> {
    tools
        .iter()
        .map(|t| ToolDescriptor {
            name: t.name.clone(),
            signature: signature_for(&t.name),
            description: t.description.trim().to_string(),
        })
        .collect()
}

/// Render the catalog as text for inclusion in the system instruction:
/// a header line, then one line per tool.
pub fn render_catalog_text(descriptors: &[ToolDescriptor]) -> String {
    let mut lines = vec!["\nTools:\n".to_string()];
    for t in descriptors {
        lines.push(format!("- {}: {} - {}", t.name, t.signature, t.description));
    }
    lines.join("\n")
}
