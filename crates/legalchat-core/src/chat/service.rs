//! Conversation service: one question in, one answer out, history extended.

use tracing::{debug, info};

use legalchat_types::chat::{ConversationHistory, ConversationMessage, ConversationTurn};
use legalchat_types::config::PromptPlacement;
use legalchat_types::error::AgentError;

use crate::agent::ReasoningAgent;
use crate::agent::prompt::LEGAL_SYSTEM_PROMPT;

/// Answer recorded when the agent produced no AI message.
pub const FALLBACK_ANSWER: &str = "응답을 생성할 수 없습니다.";

/// Answers questions through a reasoning agent, keeping the caller's history.
pub struct ConversationService<A> {
    agent: A,
    system_prompt: String,
    placement: PromptPlacement,
}

impl<A: ReasoningAgent> ConversationService<A> {
    /// Service with the legal-assistant prompt in the system channel.
    pub fn new(agent: A) -> Self {
        Self::with_prompt(agent, LEGAL_SYSTEM_PROMPT, PromptPlacement::System)
    }

    pub fn with_prompt(agent: A, system_prompt: impl Into<String>, placement: PromptPlacement) -> Self {
        Self {
            agent,
            system_prompt: system_prompt.into(),
            placement,
        }
    }

    /// Message sequence handed to the agent: prompt (also repeated as a
    /// human message with [`PromptPlacement::HumanMessage`]), every prior
    /// turn as a human/AI pair, then the new query.
    pub fn build_messages(&self, query: &str, history: &ConversationHistory) -> Vec<ConversationMessage> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 3);

        messages.push(ConversationMessage::system(self.system_prompt.clone()));
        if self.placement == PromptPlacement::HumanMessage {
            messages.push(ConversationMessage::human(self.system_prompt.clone()));
        }

        for turn in history {
            messages.push(ConversationMessage::human(turn.question()));
            messages.push(ConversationMessage::ai(turn.answer()));
        }

        messages.push(ConversationMessage::human(query));
        messages
    }

    /// Ask the agent and record `(query, answer)` in `history`.
    ///
    /// The turn is recorded even when the fallback answer is used. On agent
    /// failure the error is returned and `history` is left as it was.
    pub async fn process_query(
        &self,
        query: &str,
        history: &mut ConversationHistory,
    ) -> Result<String, AgentError> {
        let messages = self.build_messages(query, history);
        debug!(prior_turns = history.len(), messages = messages.len(), "invoking agent");

        let response = self.agent.invoke(messages).await?;

        let answer = response
            .iter()
            .rev()
            .find(|m| m.is_ai())
            .map(|m| m.content().to_string())
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string());

        history.push(ConversationTurn::new(query, answer.clone()));
        info!(turns = history.len(), answer_chars = answer.chars().count(), "turn recorded");

        Ok(answer)
    }
}
