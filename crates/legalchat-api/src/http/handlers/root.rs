use axum::Json;
use serde_json::{Value, json};

/// Service greeting.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "법률 관련 채팅 서비스" }))
}
