//! System prompt templates for the orchestrator.

use super::catalog::ToolDescriptor;
use super::render_catalog_text;

/// The strict-controller output contract sent as the system instruction.
pub const SYSTEM_PROMPT: &str = r#"You are a strict tool-using controller.

Output rules (MUST FOLLOW):
- Respond with EXACTLY ONE JSON object on a single line; no prose, no Markdown.
- If a tool is needed, return:
  {"tool":"<tool_name>","args":{...}}
- If you have the final answer, return:
  {"final":"<answer>"}

Planning rules:
- You may call multiple tools in sequence. After receiving an Observation, decide if another tool is needed or if you can finalize.
- Arguments must be the exact shapes. Numbers must be numeric, not strings.

Valid examples:
{"tool":"add_numbers","args":{"a":12.5,"b":7.25}}
{"tool":"say_hello","args":{}}
{"final":"The sum is 19.75. Hello from REST API!"}
"#;

/// Assemble the full system prompt: output contract, tool catalog, and the
/// allowed-names reminder.
pub fn build_system_prompt(descriptors: &[ToolDescriptor]) -> String {
    format!(
        "{}{}\n\nOnly use tool names that appear in the Tools list above. Never invent new tool names.",
        SYSTEM_PROMPT,
        render_catalog_text(descriptors)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_contract_catalog_and_reminder() {
        let descriptors = vec![ToolDescriptor {
            name: "say_hello".to_string(),
            signature: "say_hello() -> str".to_string(),
            description: "Say hello.".to_string(),
        }];
        let prompt = build_system_prompt(&descriptors);
        assert!(prompt.contains("EXACTLY ONE JSON object"));
        assert!(prompt.contains("- say_hello: say_hello() -> str - Say hello."));
        assert!(prompt.contains("Never invent new tool names."));
    }
}
