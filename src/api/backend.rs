//! REST tool backend: the external service the tools call into.

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Request body for `POST /add`.
#[derive(Debug, Deserialize)]
pub struct MathRequest {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Serialize)]
pub struct MathResponse {
    pub result: f64,
}

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: String,
}

pub fn routes() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/add", post(add))
}

async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from REST API!".to_string(),
    })
}

async fn add(Json(request): Json<MathRequest>) -> Json<MathResponse> {
    Json(MathResponse {
        result: request.a + request.b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hello_returns_the_fixed_greeting() {
        let Json(body) = hello().await;
        assert_eq!(body.message, "Hello from REST API!");
    }

    #[tokio::test]
    async fn add_sums_the_operands() {
        let Json(body) = add(Json(MathRequest { a: 12.5, b: 7.25 })).await;
        assert_eq!(body.result, 19.75);
    }
}
