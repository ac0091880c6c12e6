//! Repair coordinator: single corrective round-trips to the model.
//!
//! Two repair paths exist, one per failure class. Shape repair handles
//! output that broke the decision format; tool repair handles decisions
//! naming tools outside the catalog. Each offending decision gets exactly
//! one attempt; a failed attempt surfaces as [`AgentError::RepairExhausted`]
//! and the loop falls back to composing from captured state.

use tracing::{debug, warn};

use crate::llm::{ChatMessage, ChatOptions, ModelGateway};

use super::decision::{describe_violations, parse_decision, Decision};
use super::AgentError;

/// Re-ask the model after a format violation, quoting the specific rules
/// broken. `base_messages` is the conversation so far (system + user turns).
pub(crate) async fn repair_shape(
    llm: &dyn ModelGateway,
    options: &ChatOptions,
    base_messages: &[ChatMessage],
    offending_text: &str,
) -> Result<Decision, AgentError> {
    let critique = describe_violations(offending_text);
    debug!(%critique, "attempting shape repair");

    let mut messages = base_messages.to_vec();
    messages.push(ChatMessage::assistant(offending_text));
    messages.push(ChatMessage::user(format!(
        "Your previous reply violated the format: {}\nReturn ONE corrected object now.",
        critique
    )));

    let raw = llm
        .chat(&messages, options)
        .await
        .map_err(|e| exhausted("shape repair call failed", &e.to_string()))?;

    parse_decision(&raw).map_err(|e| exhausted("shape repair still malformed", &e.to_string()))
}

/// Re-ask the model after it named a tool outside the catalog, listing the
/// exact allowed identifiers. A repaired decision that still names an
/// unknown tool counts as exhaustion.
pub(crate) async fn repair_to_known_tool(
    llm: &dyn ModelGateway,
    options: &ChatOptions,
    user_input: &str,
    allowed_tools: &[String],
    offending_decision_text: &str,
) -> Result<Decision, AgentError> {
    let hint = format!(
        "Choose a tool ONLY from this exact list: {}. Return exactly one minified JSON object.",
        allowed_tools
            .iter()
            .map(|n| format!("\"{}\"", n))
            .collect::<Vec<_>>()
            .join(", ")
    );
    debug!(offending = offending_decision_text, "attempting tool repair");

    let messages = vec![
        ChatMessage::system("Return ONLY one JSON object."),
        ChatMessage::user(user_input),
        ChatMessage::assistant(offending_decision_text),
        ChatMessage::user(hint),
    ];

    let raw = llm
        .chat(&messages, options)
        .await
        .map_err(|e| exhausted("tool repair call failed", &e.to_string()))?;

    let decision =
        parse_decision(&raw).map_err(|e| exhausted("tool repair still malformed", &e.to_string()))?;

    if let Some(name) = decision.tool_name() {
        if !allowed_tools.iter().any(|t| t == name) {
            return Err(exhausted("tool repair still unknown", name));
        }
    }
    Ok(decision)
}

fn exhausted(context: &str, detail: &str) -> AgentError {
    warn!(context, detail, "repair exhausted");
    AgentError::RepairExhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ModelError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct Scripted {
        replies: Mutex<VecDeque<String>>,
    }

    impl Scripted {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl ModelGateway for Scripted {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _options: &ChatOptions,
        ) -> Result<String, ModelError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(ModelError::Empty)
        }
    }

    fn allowed() -> Vec<String> {
        vec!["add_numbers".to_string(), "say_hello".to_string()]
    }

    #[tokio::test]
    async fn tool_repair_accepts_a_known_tool() {
        let llm = Scripted::new(&["{\"tool\":\"say_hello\",\"args\":{}}"]);
        let decision = repair_to_known_tool(
            &llm,
            &ChatOptions::default(),
            "say hello",
            &allowed(),
            "{\"tool\":\"greet\",\"args\":{}}",
        )
        .await
        .unwrap();
        assert_eq!(decision.tool_name(), Some("say_hello"));
    }

    #[tokio::test]
    async fn tool_repair_rejects_a_still_unknown_tool() {
        let llm = Scripted::new(&["{\"tool\":\"still_wrong\",\"args\":{}}"]);
        let err = repair_to_known_tool(
            &llm,
            &ChatOptions::default(),
            "say hello",
            &allowed(),
            "{\"tool\":\"greet\",\"args\":{}}",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AgentError::RepairExhausted));
    }

    #[tokio::test]
    async fn shape_repair_parses_the_corrected_reply() {
        let llm = Scripted::new(&["{\"final\":\"done\"}"]);
        let base = vec![
            ChatMessage::system("sys"),
            ChatMessage::user("question"),
        ];
        let decision = repair_shape(&llm, &ChatOptions::default(), &base, "not json at all")
            .await
            .unwrap();
        assert_eq!(
            decision,
            Decision::Final {
                text: "done".to_string()
            }
        );
    }

    #[tokio::test]
    async fn shape_repair_failure_is_exhaustion() {
        let llm = Scripted::new(&["still not json"]);
        let base = vec![ChatMessage::user("question")];
        let err = repair_shape(&llm, &ChatOptions::default(), &base, "garbage")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::RepairExhausted));
    }
}
