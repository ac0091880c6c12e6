//! tool-backend - REST backend entry point.
//!
//! Serves the actual tool business logic: `GET /hello` and `POST /add`.

use toolpilot::api::backend;
use toolpilot::config::Config;
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
    let addr = format!("{}:{}", config.backend_host, config.backend_port);
    info!("Starting tool backend on {}", addr);

    let app = backend::routes().layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
