//! HTTP tool gateway: exposes the in-process registry to remote callers.
//!
//! Wire protocol consumed by [`crate::tools::HttpToolGateway`]:
//! `GET /tools` lists the catalog, `POST /call_tool` invokes by name.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tools::{ToolGateway, ToolInfo, ToolRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
}

#[derive(Debug, Serialize)]
struct ToolsResponse {
    tools: Vec<ToolInfo>,
}

#[derive(Debug, Deserialize)]
struct ToolCallRequest {
    name: String,
    #[serde(default)]
    args: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct ToolCallResponse {
    result: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/call_tool", post(call_tool))
        .with_state(state)
}

async fn list_tools(State(state): State<AppState>) -> Response {
    match state.registry.list_tools().await {
        Ok(tools) => Json(ToolsResponse { tools }).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn call_tool(State(state): State<AppState>, Json(request): Json<ToolCallRequest>) -> Response {
    match state.registry.call_tool(&request.name, &request.args).await {
        Ok(result) => Json(ToolCallResponse { result }).into_response(),
        Err(e) => {
            let message = e.to_string();
            if message.starts_with("Unknown tool") {
                error_response(StatusCode::NOT_FOUND, message)
            } else {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}
