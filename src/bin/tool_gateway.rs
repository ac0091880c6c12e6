//! tool-gateway - HTTP tool gateway entry point.
//!
//! Exposes the in-process tool registry to remote orchestrators via
//! `GET /tools` and `POST /call_tool`.

use std::sync::Arc;

use toolpilot::api::gateway::{self, AppState};
use toolpilot::config::Config;
use toolpilot::tools::ToolRegistry;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolpilot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.gateway_host, config.gateway_port);
    info!("Starting tool gateway on {}", addr);

    let state = AppState {
        registry: Arc::new(ToolRegistry::standard(&config.backend_url())),
    };
    let app = gateway::routes(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
