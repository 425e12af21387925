//! Web search port and its binding as an agent tool.

use std::future::Future;

use serde::{Deserialize, Serialize};

use legalchat_types::error::{SearchError, ToolError};
use legalchat_types::llm::ToolDefinition;

use super::AgentTool;

/// Tool name advertised to the model.
pub const SEARCH_TOOL_NAME: &str = "tavily_search_results_json";

const SEARCH_TOOL_DESCRIPTION: &str = "A search engine optimized for comprehensive, accurate, \
    and trusted results. Useful for when you need to answer questions about current events. \
    Input should be a search query.";

/// One web search hit as handed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub content: String,
}

/// A web search backend.
///
/// Implementations live in legalchat-infra (e.g., `TavilyClient`).
pub trait WebSearch: Send + Sync {
    fn search(
        &self,
        query: &str,
        max_results: u32,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;
}

/// Exposes a [`WebSearch`] backend to the agent, capped at `max_results` hits.
pub struct SearchTool<S> {
    backend: S,
    max_results: u32,
    definition: ToolDefinition,
}

impl<S: WebSearch> SearchTool<S> {
    pub fn new(backend: S, max_results: u32) -> Self {
        Self {
            backend,
            max_results,
            definition: ToolDefinition {
                name: SEARCH_TOOL_NAME.to_string(),
                description: SEARCH_TOOL_DESCRIPTION.to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "search query to look up"
                        }
                    },
                    "required": ["query"]
                }),
            },
        }
    }
}

/// Pull the query out of the model's arguments.
///
/// Accepts `{"query": "..."}` and, for models that send bare strings, a JSON
/// string.
fn extract_query(arguments: &serde_json::Value) -> Result<&str, ToolError> {
    match arguments {
        serde_json::Value::String(query) => Ok(query),
        other => other
            .get("query")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments(format!("expected a 'query' string, got {other}"))),
    }
}

impl<S: WebSearch> AgentTool for SearchTool<S> {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
        let query = extract_query(arguments)?;
        let results = self.backend.search(query, self.max_results).await?;
        tracing::debug!(query, hits = results.len(), "web search complete");

        serde_json::to_string(&results).map_err(|e| SearchError::Parse(e.to_string()).into())
    }
}
