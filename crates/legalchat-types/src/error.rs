use thiserror::Error;

use crate::llm::LlmError;

/// Errors raised while assembling the agent from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("invalid setting '{name}': {message}")]
    Invalid { name: &'static str, message: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors from web search providers.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(String),

    #[error("search provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse search results: {0}")]
    Parse(String),
}

/// Errors from a single tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Errors from a reasoning agent invocation.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("agent stopped after {0} model calls without a final answer")]
    StepLimitExceeded(u32),
}
