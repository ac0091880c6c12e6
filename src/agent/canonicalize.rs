//! Tool argument canonicalization.
//!
//! Models spell argument names inconsistently (`a`, `x`, `num1`, ...) and
//! routinely drop arguments entirely. Canonicalization maps accepted alias
//! spellings onto each tool's canonical parameter names, then backfills
//! still-missing numeric slots from the original user text. The function is
//! pure and idempotent.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Generic numeric literal: optional sign, digits, optional decimal part,
/// optional exponent.
static NUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").unwrap());

/// Accepted alias spellings for each canonical parameter, per tool.
/// Matching is case-insensitive; the canonical name is its own first alias.
const ADD_NUMBERS_ALIASES: &[(&str, &[&str])] = &[
    (
        "a",
        &["a", "x", "left", "lhs", "num1", "number1", "first", "value1"],
    ),
    (
        "b",
        &["b", "y", "right", "rhs", "num2", "number2", "second", "value2"],
    ),
];

/// Tools that take no parameters; any supplied arguments are dropped.
const NO_ARG_TOOLS: &[&str] = &["say_hello"];

/// Scan text for numeric literals in order of appearance.
fn extract_numbers(text: &str) -> Vec<f64> {
    NUM_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Map tool arguments onto canonical parameter names.
///
/// For `add_numbers`, missing canonical slots are filled from the first and
/// second numeric literals found in `user_text`, in order of appearance,
/// never overwriting an already-resolved value. No-arg tools return an empty
/// set; unknown tools pass through unchanged.
pub fn canonicalize_args(
    tool: &str,
    args: &Map<String, Value>,
    user_text: &str,
) -> Map<String, Value> {
    if NO_ARG_TOOLS.contains(&tool) {
        return Map::new();
    }

    if tool == "add_numbers" {
        let lower: Map<String, Value> = args
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect();

        let mut out = Map::new();
        for (canonical, aliases) in ADD_NUMBERS_ALIASES {
            if let Some(value) = aliases.iter().find_map(|k| lower.get(*k)) {
                out.insert(canonical.to_string(), value.clone());
            }
        }

        // Backfill missing slots from the user's own wording: the first
        // literal pairs with the first parameter, the second with the second.
        if out.len() < ADD_NUMBERS_ALIASES.len() {
            let numbers = extract_numbers(user_text);
            for (i, (canonical, _)) in ADD_NUMBERS_ALIASES.iter().enumerate() {
                if out.contains_key(*canonical) {
                    continue;
                }
                if let Some(num) = numbers.get(i).copied().and_then(serde_json::Number::from_f64)
                {
                    out.insert(canonical.to_string(), Value::Number(num));
                }
            }
        }
        return out;
    }

    args.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn resolves_aliases_case_insensitively() {
        let args = obj(json!({"Num1": 3, "RHS": 4}));
        let out = canonicalize_args("add_numbers", &args, "");
        assert_eq!(out["a"], json!(3));
        assert_eq!(out["b"], json!(4));
    }

    #[test]
    fn canonical_names_pass_through() {
        let args = obj(json!({"a": 1.5, "b": 2.5}));
        let out = canonicalize_args("add_numbers", &args, "irrelevant 9 8");
        assert_eq!(out["a"], json!(1.5));
        assert_eq!(out["b"], json!(2.5));
    }

    #[test]
    fn backfills_from_user_text_in_order() {
        let args = Map::new();
        let out = canonicalize_args("add_numbers", &args, "Please add 12.5 and 7.25.");
        assert_eq!(out["a"], json!(12.5));
        assert_eq!(out["b"], json!(7.25));
    }

    #[test]
    fn backfill_never_overwrites_resolved_values() {
        let args = obj(json!({"a": 100}));
        let out = canonicalize_args("add_numbers", &args, "add 1 and 2");
        assert_eq!(out["a"], json!(100));
        // the second literal still pairs with the second parameter
        assert_eq!(out["b"], json!(2.0));
    }

    #[test]
    fn partial_backfill_leaves_slot_missing() {
        let args = Map::new();
        let out = canonicalize_args("add_numbers", &args, "just the number 5 here");
        assert_eq!(out["a"], json!(5.0));
        assert!(!out.contains_key("b"));
    }

    #[test]
    fn no_arg_tools_drop_everything() {
        let args = obj(json!({"name": "world", "x": 1}));
        let out = canonicalize_args("say_hello", &args, "say hello to 5 people");
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_tools_pass_through() {
        let args = obj(json!({"whatever": "value"}));
        let out = canonicalize_args("mystery_tool", &args, "add 1 and 2");
        assert_eq!(out, args);
    }

    #[test]
    fn idempotent() {
        let text = "Please add 12.5 and 7.25, then say hello.";
        let args = obj(json!({"x": "12.5"}));
        let once = canonicalize_args("add_numbers", &args, text);
        let twice = canonicalize_args("add_numbers", &once, text);
        assert_eq!(once, twice);
    }

    #[test]
    fn extracts_signed_and_exponent_literals() {
        let nums = extract_numbers("go from -3.5 to 2e2 now");
        assert_eq!(nums, vec![-3.5, 200.0]);
    }
}
