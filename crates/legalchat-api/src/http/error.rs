//! Application error type mapping to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use legalchat_types::error::AgentError;

/// Failure while answering a chat request.
#[derive(Debug)]
pub enum AppError {
    Agent(AgentError),
}

impl From<AgentError> for AppError {
    fn from(e: AgentError) -> Self {
        AppError::Agent(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Agent(e) = &self;
        error!(error = %e, "chat request failed");

        let body = json!({ "detail": format!("오류 발생 : {e}") });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
