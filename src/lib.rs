//! # toolpilot
//!
//! A tool-calling orchestrator for local LLMs that produce free-form,
//! occasionally malformed text instead of a reliable machine interface.
//!
//! This library provides:
//! - Decision extraction and normalization from raw model output
//! - Bounded repair round-trips for malformed or out-of-catalog decisions
//! - Argument canonicalization across inconsistent naming
//! - A bounded orchestration loop over abstract model and tool gateways
//!
//! ## Architecture
//!
//! The orchestrator alternates between model decisions and tool execution:
//! 1. Render the tool catalog into a strict-controller system prompt
//! 2. Ask the model for a decision, extract and validate the JSON object
//! 3. Repair or canonicalize as needed, execute the tool
//! 4. Feed the observation back, repeat until a final string is composed
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolpilot::{agent::{Agent, AgentOptions}, config::Config};
//! use toolpilot::llm::OllamaClient;
//! use toolpilot::tools::ToolRegistry;
//!
//! let config = Config::from_env()?;
//! let llm = Arc::new(OllamaClient::new(&config.ollama_url, &config.model));
//! let tools = Arc::new(ToolRegistry::standard(&config.backend_url()));
//! let agent = Agent::new(AgentOptions::from_config(&config), llm, tools);
//! let answer = agent.run("Please add 12.5 and 7.25, then say hello.").await;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
