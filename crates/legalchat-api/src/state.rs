//! Shared state for the HTTP API.

use std::sync::Arc;

use legalchat_core::agent::BoxReasoningAgent;
use legalchat_core::agent::prompt::LEGAL_SYSTEM_PROMPT;
use legalchat_core::chat::service::ConversationService;
use legalchat_core::chat::store::{SessionLimits, SessionStore};
use legalchat_types::config::PromptPlacement;

pub type ConcreteConversationService = ConversationService<BoxReasoningAgent>;

/// Cloned into every handler by axum.
#[derive(Clone)]
pub struct AppState {
    pub conversation: Arc<ConcreteConversationService>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(agent: BoxReasoningAgent, placement: PromptPlacement, limits: SessionLimits) -> Self {
        Self {
            conversation: Arc::new(ConversationService::with_prompt(agent, LEGAL_SYSTEM_PROMPT, placement)),
            sessions: Arc::new(SessionStore::with_limits(limits)),
        }
    }
}
