//! toolpilot - CLI entry point.
//!
//! Runs one orchestration for the question given on the command line and
//! prints the composed final answer.

use std::sync::Arc;

use toolpilot::agent::{Agent, AgentOptions};
use toolpilot::config::Config;
use toolpilot::llm::OllamaClient;
use toolpilot::tools::{HttpToolGateway, ToolGateway, ToolRegistry};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_QUESTION: &str = "Please add 12.5 and 7.25, then say hello.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolpilot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.model);

    let question = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            DEFAULT_QUESTION.to_string()
        } else {
            args.join(" ")
        }
    };

    let llm = Arc::new(OllamaClient::new(
        config.ollama_url.clone(),
        config.model.clone(),
    ));
    let tools: Arc<dyn ToolGateway> = match &config.tool_gateway_url {
        Some(url) => {
            info!("Using remote tool gateway at {}", url);
            Arc::new(HttpToolGateway::new(url))
        }
        None => Arc::new(ToolRegistry::standard(&config.backend_url())),
    };

    let agent = Agent::new(AgentOptions::from_config(&config), llm, tools);
    let answer = agent.run(&question).await;
    println!("{}", answer);

    Ok(())
}
