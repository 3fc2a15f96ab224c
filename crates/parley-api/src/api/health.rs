use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}
