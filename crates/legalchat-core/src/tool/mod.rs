//! Tools the reasoning agent may call.
//!
//! Same shape as the LLM provider port: an RPITIT [`AgentTool`] trait for
//! concrete tools, plus [`BoxAgentTool`] so the agent can hold a
//! heterogeneous tool list.

pub mod search;

use std::future::Future;
use std::pin::Pin;

use legalchat_types::error::ToolError;
use legalchat_types::llm::ToolDefinition;

/// A callable tool exposed to the model.
pub trait AgentTool: Send + Sync {
    /// Name, description and argument schema advertised to the model.
    fn definition(&self) -> &ToolDefinition;

    /// Run the tool with the model-supplied arguments and return the text
    /// handed back to the model.
    fn call(
        &self,
        arguments: &serde_json::Value,
    ) -> impl Future<Output = Result<String, ToolError>> + Send;
}

/// Object-safe version of [`AgentTool`] with boxed futures.
pub trait AgentToolDyn: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    fn call_boxed<'a>(
        &'a self,
        arguments: &'a serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>>;
}

impl<T: AgentTool> AgentToolDyn for T {
    fn definition(&self) -> &ToolDefinition {
        AgentTool::definition(self)
    }

    fn call_boxed<'a>(
        &'a self,
        arguments: &'a serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>> {
        Box::pin(self.call(arguments))
    }
}

/// Type-erased agent tool.
pub struct BoxAgentTool {
    inner: Box<dyn AgentToolDyn + Send + Sync>,
}

impl BoxAgentTool {
    pub fn new<T: AgentTool + 'static>(tool: T) -> Self {
        Self {
            inner: Box::new(tool),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.definition().name
    }

    pub fn definition(&self) -> &ToolDefinition {
        self.inner.definition()
    }

    pub async fn call(&self, arguments: &serde_json::Value) -> Result<String, ToolError> {
        self.inner.call_boxed(arguments).await
    }
}
