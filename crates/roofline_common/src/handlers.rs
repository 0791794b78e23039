// --- File: crates/roofline_common/src/handlers.rs ---

// HTTP request handlers shared across the application.

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe used by the dashboard's deploy checks.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
