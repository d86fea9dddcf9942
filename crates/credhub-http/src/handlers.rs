use axum::Json;
use serde_json::{json, Value};

/// Liveness check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}
