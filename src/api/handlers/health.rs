//! Health check handler.

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Liveness probe
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
