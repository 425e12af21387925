//! POST /chat
//!
//! Unwraps the question from the request envelope, answers it within the
//! caller's session, and wraps the answer back into the response envelope.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::info;

use legalchat_core::chat::store::DEFAULT_SESSION;

use crate::http::envelope::{ChatRequest, ChatResponse};
use crate::http::error::AppError;
use crate::state::AppState;

/// Header naming the conversation a request belongs to.
pub const SESSION_HEADER: &str = "x-session-id";

fn session_id(headers: &HeaderMap) -> &str {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SESSION)
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session = session_id(&headers);
    let query = request.query();
    info!(session_id = %session, query_chars = query.chars().count(), "chat request");

    let shared = state.sessions.session(session);
    let mut history = shared.lock().await;
    let answer = state.conversation.process_query(query, &mut history).await?;

    Ok(Json(ChatResponse::from_answer(answer)))
}
