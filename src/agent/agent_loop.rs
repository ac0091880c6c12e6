//! Core orchestration loop.
//!
//! Drives a bounded decide/validate/repair/execute cycle between the model
//! gateway and the tool gateway. Every failure class is recovered here: the
//! run always returns a string, composed from whatever was captured.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::llm::{ChatMessage, ChatOptions, ModelGateway};
use crate::tools::ToolGateway;

use super::canonicalize::canonicalize_args;
use super::catalog::tool_descriptors;
use super::decision::{parse_decision, Decision};
use super::prompt::build_system_prompt;
use super::repair;
use super::AgentError;

const ADD_TOOL: &str = "add_numbers";
const GREET_TOOL: &str = "say_hello";
const FALLBACK_ANSWER: &str = "I couldn't complete the requested steps.";

/// Decides whether the user's wording demands a greeting before any final
/// answer is honored. Deliberately textual; see the default.
pub type GreetingPredicate = fn(&str) -> bool;

/// Default substring heuristic for greeting detection.
fn default_greeting_predicate(user_input: &str) -> bool {
    let lower = user_input.to_lowercase();
    lower.contains("say hello") || lower.contains("say_hello")
}

/// Options for the orchestrator.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Per-call model options (timeout, structured output).
    pub chat: ChatOptions,

    /// Maximum decision/tool round trips per run.
    pub max_steps: usize,

    /// Mandatory-greeting detection predicate.
    pub requires_greeting: GreetingPredicate,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            chat: ChatOptions::default(),
            max_steps: 5,
            requires_greeting: default_greeting_predicate,
        }
    }
}

impl AgentOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chat: ChatOptions {
                timeout: config.llm_timeout,
                force_json: true,
            },
            max_steps: config.max_steps,
            requires_greeting: default_greeting_predicate,
        }
    }
}

/// Loop-local state for one run. Created fresh per invocation, owned
/// exclusively by the loop, destroyed when the run returns.
struct RunState {
    steps: usize,
    max_steps: usize,
    must_greet: bool,
    sum_value: Option<f64>,
    greet_msg: Option<String>,
    allowed_tool_names: HashSet<String>,
}

impl RunState {
    fn new(max_steps: usize, must_greet: bool, allowed_tool_names: HashSet<String>) -> Self {
        Self {
            steps: 0,
            max_steps,
            must_greet,
            sum_value: None,
            greet_msg: None,
            allowed_tool_names,
        }
    }

    /// Compose the run's final string. Priority: captured sum and greeting
    /// combined, then sum alone, then greeting alone, then the model's own
    /// final text, then the fixed apology.
    fn compose_final(&self, model_final: Option<&str>) -> String {
        match (self.sum_value, &self.greet_msg) {
            (Some(sum), Some(greet)) => format!("The sum is {}. {}", sum, greet),
            (Some(sum), None) => format!("The sum is {}", sum),
            (None, Some(greet)) => greet.clone(),
            (None, None) => model_final
                .map(str::to_string)
                .unwrap_or_else(|| FALLBACK_ANSWER.to_string()),
        }
    }
}

fn forced_greeting() -> Decision {
    Decision::ToolCall {
        name: GREET_TOOL.to_string(),
        args: Map::new(),
    }
}

fn has_add_args(args: &Map<String, Value>) -> bool {
    args.contains_key("a") && args.contains_key("b")
}

/// The orchestrator: ties decision interpretation, repair, canonicalization
/// and tool execution together across a bounded number of steps.
pub struct Agent {
    options: AgentOptions,
    llm: Arc<dyn ModelGateway>,
    tools: Arc<dyn ToolGateway>,
}

impl Agent {
    pub fn new(options: AgentOptions, llm: Arc<dyn ModelGateway>, tools: Arc<dyn ToolGateway>) -> Self {
        Self { options, llm, tools }
    }

    /// Run one orchestration for `user_input`. Never fails: any unrecovered
    /// error path exits through the composed-final fallback.
    pub async fn run(&self, user_input: &str) -> String {
        let run_id = Uuid::new_v4();
        info!(%run_id, user_input, "starting run");

        let catalog = match self.tools.list_tools().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(%run_id, error = %e, "tool catalog unavailable");
                return FALLBACK_ANSWER.to_string();
            }
        };
        let descriptors = tool_descriptors(&catalog);
        let allowed: Vec<String> = descriptors.iter().map(|d| d.name.clone()).collect();

        let mut state = RunState::new(
            self.options.max_steps,
            (self.options.requires_greeting)(user_input),
            allowed.iter().cloned().collect(),
        );

        let initial_messages = vec![
            ChatMessage::system(build_system_prompt(&descriptors)),
            ChatMessage::user(user_input),
        ];

        let mut decision = match self.first_decision(&initial_messages).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(%run_id, error = %e, "no usable first decision");
                return state.compose_final(None);
            }
        };

        // Minimal follow-up context; the full system prompt is not repeated.
        let context_messages = vec![
            ChatMessage::system("Return ONLY one minified JSON object each turn."),
            ChatMessage::user(user_input),
        ];

        while state.steps < state.max_steps {
            let (name, args) = match decision {
                Decision::Final { text } => {
                    if state.must_greet && state.greet_msg.is_none() {
                        // The greeting precondition is enforced here, not
                        // trusted to the model.
                        info!(%run_id, "overriding premature final with forced greeting");
                        decision = forced_greeting();
                        continue;
                    }
                    return state.compose_final(Some(&text));
                }
                Decision::ToolCall { name, args } => (name, args),
            };

            // Out-of-catalog tool: one corrective round trip.
            if !state.allowed_tool_names.contains(&name) {
                debug!(%run_id, error = %AgentError::UnknownTool(name.clone()), "decision validation failed");
                let offending = Decision::ToolCall {
                    name: name.clone(),
                    args: args.clone(),
                }
                .to_wire()
                .to_string();
                decision = match repair::repair_to_known_tool(
                    self.llm.as_ref(),
                    &self.options.chat,
                    user_input,
                    &allowed,
                    &offending,
                )
                .await
                {
                    Ok(repaired) => repaired,
                    Err(_) => break,
                };
                continue;
            }

            // Canonicalize, with a single narrowly-scoped re-extraction if
            // the add tool is still short of arguments.
            let mut tool_args = canonicalize_args(&name, &args, user_input);
            if name == ADD_TOOL && !has_add_args(&tool_args) {
                if let Some(recovered) = self.reextract_add_args(user_input).await {
                    tool_args = recovered;
                }
            }
            if name == ADD_TOOL && !has_add_args(&tool_args) {
                let missing = if tool_args.contains_key("a") { "b" } else { "a" };
                let err = AgentError::ArgumentMissing {
                    tool: name.clone(),
                    arg: missing.to_string(),
                };
                warn!(%run_id, error = %err, "abandoning tool call");
                break;
            }

            let observation = match self.tools.call_tool(&name, &tool_args).await {
                Ok(observation) => observation,
                Err(e) => {
                    let err = AgentError::ToolInvocation(e.to_string());
                    warn!(%run_id, tool = name.as_str(), error = %err, "tool invocation failed");
                    break;
                }
            };
            debug!(%run_id, tool = name.as_str(), observation = observation.as_str(), "observation");

            // Deterministic accumulators, independent of model phrasing.
            if name == ADD_TOOL {
                if let Ok(value) = observation.trim().parse::<f64>() {
                    state.sum_value = Some(value);
                }
            } else if name == GREET_TOOL {
                state.greet_msg = Some(observation.clone());
            }

            // Pending mandatory greeting short-circuits the model.
            if state.must_greet && state.greet_msg.is_none() {
                decision = forced_greeting();
                state.steps += 1;
                continue;
            }

            // Feed the observation back and ask for the next decision.
            let executed = Decision::ToolCall {
                name,
                args: tool_args,
            };
            let mut messages = context_messages.clone();
            messages.push(ChatMessage::assistant(executed.to_wire().to_string()));
            messages.push(ChatMessage::user(format!(
                "Observation: {}\nReturn either the next tool JSON or the final JSON. Use only these tools: {}",
                observation,
                allowed.join(", ")
            )));

            let raw = match self.llm.chat(&messages, &self.options.chat).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(%run_id, error = %e, "model gateway failed mid-run");
                    break;
                }
            };
            decision = match parse_decision(&raw) {
                Ok(next) => next,
                Err(e) => {
                    warn!(%run_id, error = %e, "next decision unparseable");
                    break;
                }
            };
            state.steps += 1;
        }

        state.compose_final(None)
    }

    /// First decision of a run, with one shape repair if the raw output
    /// fails extraction or normalization. A gateway failure is not repaired.
    async fn first_decision(&self, messages: &[ChatMessage]) -> Result<Decision, AgentError> {
        let raw = self
            .llm
            .chat(messages, &self.options.chat)
            .await
            .map_err(|_| AgentError::RepairExhausted)?;

        match parse_decision(&raw) {
            Ok(decision) => Ok(decision),
            Err(e) => {
                debug!(error = %e, "first decision malformed, repairing");
                repair::repair_shape(self.llm.as_ref(), &self.options.chat, messages, &raw).await
            }
        }
    }

    /// Ask the model for just the two numeric values from the user text.
    /// One attempt; anything other than a well-formed add call is discarded.
    async fn reextract_add_args(&self, user_input: &str) -> Option<Map<String, Value>> {
        let messages = vec![
            ChatMessage::system(
                "Return ONLY one minified JSON object like {\"tool\":\"add_numbers\",\"args\":{\"a\":<float>,\"b\":<float>}}",
            ),
            ChatMessage::user(format!(
                "From this instruction, extract the two numbers as 'a' and 'b' and return the tool call only: {}",
                user_input
            )),
        ];

        let raw = self.llm.chat(&messages, &self.options.chat).await.ok()?;
        match parse_decision(&raw) {
            Ok(Decision::ToolCall { name, args }) if name == ADD_TOOL => {
                Some(canonicalize_args(ADD_TOOL, &args, user_input))
            }
            _ => None,
        }
    }
}
