//! Reasoning agent port and its implementations.
//!
//! A reasoning agent takes a message sequence and returns the sequence
//! extended with whatever it generated: model replies, tool calls and tool
//! results. [`react::ReactAgent`] is the concrete tool-calling agent;
//! [`BoxReasoningAgent`] erases the concrete type for shared state.

pub mod prompt;
pub mod react;

use std::future::Future;
use std::pin::Pin;

use legalchat_types::chat::ConversationMessage;
use legalchat_types::error::AgentError;

/// Capability interface over a (possibly suspending) reasoning agent.
pub trait ReasoningAgent: Send + Sync {
    /// Submit the messages and return the resulting message sequence.
    fn invoke(
        &self,
        messages: Vec<ConversationMessage>,
    ) -> impl Future<Output = Result<Vec<ConversationMessage>, AgentError>> + Send;
}

/// Object-safe version of [`ReasoningAgent`] with boxed futures.
pub trait ReasoningAgentDyn: Send + Sync {
    fn invoke_boxed(
        &self,
        messages: Vec<ConversationMessage>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ConversationMessage>, AgentError>> + Send + '_>>;
}

impl<T: ReasoningAgent> ReasoningAgentDyn for T {
    fn invoke_boxed(
        &self,
        messages: Vec<ConversationMessage>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ConversationMessage>, AgentError>> + Send + '_>> {
        Box::pin(self.invoke(messages))
    }
}

/// Type-erased reasoning agent.
pub struct BoxReasoningAgent {
    inner: Box<dyn ReasoningAgentDyn + Send + Sync>,
}

impl BoxReasoningAgent {
    pub fn new<T: ReasoningAgent + 'static>(agent: T) -> Self {
        Self {
            inner: Box::new(agent),
        }
    }
}

impl ReasoningAgent for BoxReasoningAgent {
    async fn invoke(
        &self,
        messages: Vec<ConversationMessage>,
    ) -> Result<Vec<ConversationMessage>, AgentError> {
        self.inner.invoke_boxed(messages).await
    }
}
