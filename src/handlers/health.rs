//! Health check handler

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::state::AppState;

/// Health check routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
