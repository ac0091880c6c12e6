//! Decision extraction and normalization.
//!
//! The model is supposed to emit exactly one minified JSON object per turn,
//! either `{"tool": ..., "args": {...}}` or `{"final": "..."}`. In practice
//! it wraps the object in prose and code fences, stringifies numbers, and
//! occasionally ships `args` as a list of objects. This module turns that raw
//! text into a [`Decision`] or a precise error for the repair path.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::AgentError;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^```(?:json)?|```$").unwrap());

/// A validated model decision: exactly one variant per turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// The model's final answer.
    Final { text: String },

    /// A request to invoke a tool. Argument values are scalars only after
    /// normalization.
    ToolCall {
        name: String,
        args: Map<String, Value>,
    },
}

impl Decision {
    /// Render the decision back to its wire form, e.g. for echoing the
    /// assistant turn into the conversation.
    pub fn to_wire(&self) -> Value {
        match self {
            Decision::Final { text } => {
                let mut obj = Map::new();
                obj.insert("final".to_string(), Value::String(text.clone()));
                Value::Object(obj)
            }
            Decision::ToolCall { name, args } => {
                let mut obj = Map::new();
                obj.insert("tool".to_string(), Value::String(name.clone()));
                obj.insert("args".to_string(), Value::Object(args.clone()));
                Value::Object(obj)
            }
        }
    }

    /// Tool name, if this is a tool call.
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Decision::ToolCall { name, .. } => Some(name),
            Decision::Final { .. } => None,
        }
    }
}

fn strip_fences_and_prose(raw: &str) -> String {
    let s = FENCE_RE.replace_all(raw.trim(), "");
    let s = s.trim();
    match s.find('{') {
        Some(idx) if idx > 0 => s[idx..].to_string(),
        _ => s.to_string(),
    }
}

/// Isolate the first balanced `{...}` block from raw model output.
///
/// Leading/trailing code fences and any prose before the first `{` are
/// discarded. Fails if no complete balanced object exists, including the
/// unmatched-brace case.
pub fn extract_json_object(raw: &str) -> Result<String, AgentError> {
    let text = strip_fences_and_prose(raw);
    let mut depth = 0usize;
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        return Ok(text[s..=idx].to_string());
                    }
                }
            }
            _ => {}
        }
    }
    Err(AgentError::Extraction(
        "no balanced object in model output".to_string(),
    ))
}

/// Extract, parse and normalize raw model output into a [`Decision`].
pub fn parse_decision(raw: &str) -> Result<Decision, AgentError> {
    let json_text = extract_json_object(raw)?;
    let value: Value = serde_json::from_str(&json_text)
        .map_err(|e| AgentError::Extraction(e.to_string()))?;
    normalize(value)
}

/// Validate a parsed JSON value against the two legal decision shapes.
pub fn normalize(value: Value) -> Result<Decision, AgentError> {
    let obj = match value {
        Value::Object(obj) => obj,
        _ => return Err(AgentError::Shape("top level is not an object".to_string())),
    };

    if obj.contains_key("final") {
        if obj.len() != 1 {
            return Err(AgentError::Shape(
                "'final' must be the only key".to_string(),
            ));
        }
        return match &obj["final"] {
            Value::String(text) => Ok(Decision::Final { text: text.clone() }),
            _ => Err(AgentError::Shape("'final' must be a string".to_string())),
        };
    }

    if let Some(tool) = obj.get("tool") {
        let name = tool
            .as_str()
            .ok_or_else(|| AgentError::Shape("'tool' must be a string".to_string()))?
            .to_string();

        let args = match obj.get("args") {
            None => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            // Common model mistake: a list of single-key objects. Merge them,
            // later keys win.
            Some(Value::Array(items)) => {
                let mut merged = Map::new();
                for item in items {
                    if let Value::Object(map) = item {
                        for (k, v) in map {
                            merged.insert(k.clone(), v.clone());
                        }
                    }
                }
                merged
            }
            Some(_) => {
                return Err(AgentError::Shape("'args' must be an object".to_string()));
            }
        };

        return Ok(Decision::ToolCall {
            name,
            args: coerce_numbers(args),
        });
    }

    Err(AgentError::Shape("missing 'final' or 'tool'".to_string()))
}

/// Coerce string-typed argument values that look purely numeric: integer
/// when no `.`/`e`/`E` marker is present, float otherwise. Failures leave
/// the original string untouched.
fn coerce_numbers(mut args: Map<String, Value>) -> Map<String, Value> {
    for value in args.values_mut() {
        if let Value::String(s) = value {
            let coerced = if s.contains(['.', 'e', 'E']) {
                s.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
            } else {
                s.parse::<i64>().ok().map(serde_json::Number::from)
            };
            if let Some(n) = coerced {
                *value = Value::Number(n);
            }
        }
    }
    args
}

/// Produce a human-readable list of the format rules a raw output broke,
/// used to build repair prompts. On total parse failure the underlying
/// error message is returned instead.
pub fn describe_violations(raw: &str) -> String {
    let value: Value = match extract_json_object(raw)
        .and_then(|s| serde_json::from_str(&s).map_err(|e| AgentError::Extraction(e.to_string())))
    {
        Ok(v) => v,
        Err(e) => return format!("Your output was not a single JSON object. Error: {}", e),
    };

    let mut notes = Vec::new();
    if value.is_array() {
        notes.push("Top-level must be an object, not an array.");
    }
    if let Value::Object(obj) = &value {
        if obj.contains_key("final") && obj.contains_key("tool") {
            notes.push("Do not include both 'final' and 'tool'.");
        }
        if obj.contains_key("tool") && obj.get("args").map(Value::is_array).unwrap_or(false) {
            notes.push("'args' must be an object, not an array.");
        }
    }

    if notes.is_empty() {
        "Output shape violated the rules.".to_string()
    } else {
        notes.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_object_from_prose_and_fences() {
        let raw = "Sure, here is the call:\n```json\n{\"tool\":\"add_numbers\",\"args\":{\"a\":1,\"b\":2}}\n```\nLet me know!";
        let extracted = extract_json_object(raw).unwrap();
        assert_eq!(
            extracted,
            "{\"tool\":\"add_numbers\",\"args\":{\"a\":1,\"b\":2}}"
        );
    }

    #[test]
    fn extraction_handles_nested_objects() {
        let raw = "x {\"tool\":\"t\",\"args\":{\"inner\":{\"k\":1}}} trailing";
        let extracted = extract_json_object(raw).unwrap();
        assert!(extracted.starts_with('{') && extracted.ends_with('}'));
        let parsed: Value = serde_json::from_str(&extracted).unwrap();
        assert_eq!(parsed["args"]["inner"]["k"], 1);
    }

    #[test]
    fn extraction_fails_on_unbalanced_braces() {
        assert!(extract_json_object("{\"tool\": \"add_numbers\"").is_err());
        assert!(extract_json_object("no json here at all").is_err());
    }

    #[test]
    fn normalize_rejects_non_objects() {
        assert!(matches!(
            normalize(json!(["a", "b"])),
            Err(AgentError::Shape(_))
        ));
    }

    #[test]
    fn normalize_final_requires_single_string_key() {
        let decision = normalize(json!({"final": "done"})).unwrap();
        assert_eq!(
            decision,
            Decision::Final {
                text: "done".to_string()
            }
        );

        assert!(normalize(json!({"final": "done", "tool": "x"})).is_err());
        assert!(normalize(json!({"final": 42})).is_err());
    }

    #[test]
    fn normalize_coerces_integer_strings_to_integers() {
        let decision =
            normalize(json!({"tool": "add_numbers", "args": {"a": "12", "b": "7"}})).unwrap();
        let Decision::ToolCall { args, .. } = decision else {
            panic!("expected tool call");
        };
        assert_eq!(args["a"], json!(12));
        assert_eq!(args["b"], json!(7));
    }

    #[test]
    fn normalize_coerces_decimal_strings_to_floats() {
        let decision =
            normalize(json!({"tool": "add_numbers", "args": {"a": "12.5", "b": "7e1"}})).unwrap();
        let Decision::ToolCall { args, .. } = decision else {
            panic!("expected tool call");
        };
        assert_eq!(args["a"], json!(12.5));
        assert_eq!(args["b"], json!(70.0));
    }

    #[test]
    fn normalize_leaves_non_numeric_strings_alone() {
        let decision = normalize(json!({"tool": "t", "args": {"k": "hello"}})).unwrap();
        let Decision::ToolCall { args, .. } = decision else {
            panic!("expected tool call");
        };
        assert_eq!(args["k"], json!("hello"));
    }

    #[test]
    fn normalize_merges_list_shaped_args() {
        let decision =
            normalize(json!({"tool": "add_numbers", "args": [{"a": 1}, {"b": 2}]})).unwrap();
        let Decision::ToolCall { name, args } = decision else {
            panic!("expected tool call");
        };
        assert_eq!(name, "add_numbers");
        assert_eq!(args["a"], json!(1));
        assert_eq!(args["b"], json!(2));
    }

    #[test]
    fn normalize_list_args_later_keys_win() {
        let decision = normalize(json!({"tool": "t", "args": [{"a": 1}, {"a": 9}]})).unwrap();
        let Decision::ToolCall { args, .. } = decision else {
            panic!("expected tool call");
        };
        assert_eq!(args["a"], json!(9));
    }

    #[test]
    fn normalize_rejects_null_args() {
        assert!(matches!(
            normalize(json!({"tool": "add_numbers", "args": null})),
            Err(AgentError::Shape(_))
        ));
    }

    #[test]
    fn normalize_requires_final_or_tool() {
        assert!(matches!(
            normalize(json!({"answer": "x"})),
            Err(AgentError::Shape(_))
        ));
    }

    #[test]
    fn violations_names_broken_rules() {
        let msg = describe_violations("{\"final\": \"x\", \"tool\": \"y\"}");
        assert!(msg.contains("both 'final' and 'tool'"));

        let msg = describe_violations("{\"tool\": \"t\", \"args\": [1, 2]}");
        assert!(msg.contains("'args' must be an object"));
    }

    #[test]
    fn violations_reports_parse_failures() {
        let msg = describe_violations("total garbage");
        assert!(msg.contains("not a single JSON object"));
    }

    #[test]
    fn wire_round_trip() {
        let decision = Decision::ToolCall {
            name: "say_hello".to_string(),
            args: Map::new(),
        };
        assert_eq!(
            decision.to_wire().to_string(),
            "{\"args\":{},\"tool\":\"say_hello\"}"
        );
    }
}
