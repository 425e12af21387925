//! Conversation types for legalchat.
//!
//! A conversation is a linear list of question/answer turns. Before each
//! agent call the history is flattened into [`ConversationMessage`]s; those
//! messages are transient and never stored.

use serde::{Deserialize, Serialize};

use crate::llm::{Message, ToolCall};

/// One question and the answer recorded for it.
///
/// Immutable once created: fields are only readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    question: String,
    answer: String,
}

impl ConversationTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Ordered turns of one conversation, oldest first.
///
/// Append-only: turns are never removed, replaced, or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversationTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a ConversationTurn;
    type IntoIter = std::slice::Iter<'a, ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// A message exchanged with the reasoning agent.
///
/// `Human` and `Ai` carry the conversation itself; `System` carries the
/// instruction prompt and `Tool` carries a tool result produced inside the
/// agent's reasoning loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationMessage {
    System {
        content: String,
    },
    Human {
        content: String,
    },
    Ai {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        name: String,
        content: String,
    },
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    /// An AI reply with no tool calls.
    pub fn ai(content: impl Into<String>) -> Self {
        Self::Ai {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::System { content }
            | Self::Human { content }
            | Self::Ai { content, .. }
            | Self::Tool { content, .. } => content,
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Self::Ai { .. })
    }
}

impl From<&ConversationMessage> for Message {
    fn from(msg: &ConversationMessage) -> Self {
        match msg {
            ConversationMessage::System { content } => Message::system(content.clone()),
            ConversationMessage::Human { content } => Message::user(content.clone()),
            ConversationMessage::Ai {
                content,
                tool_calls,
            } => Message::assistant(content.clone(), tool_calls.clone()),
            ConversationMessage::Tool {
                tool_call_id,
                content,
                ..
            } => Message::tool(tool_call_id.clone(), content.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_history_appends_in_order() {
        let mut history = ConversationHistory::new();
        assert!(history.is_empty());

        history.push(ConversationTurn::new("first", "a1"));
        history.push(ConversationTurn::new("second", "a2"));

        assert_eq!(history.len(), 2);
        let questions: Vec<&str> = history.iter().map(|t| t.question()).collect();
        assert_eq!(questions, vec!["first", "second"]);
        assert_eq!(history.last().unwrap().answer(), "a2");
    }

    #[test]
    fn test_history_keeps_duplicates() {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::new("same", "same"));
        history.push(ConversationTurn::new("same", "same"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_history_serializes_as_list() {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::new("q", "a"));
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json, serde_json::json!([{"question": "q", "answer": "a"}]));
    }

    #[test]
    fn test_message_tagging() {
        let json = serde_json::to_value(ConversationMessage::human("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "human", "content": "hello"}));
    }

    #[test]
    fn test_message_to_llm_message() {
        let tool = ConversationMessage::Tool {
            tool_call_id: "call_9".to_string(),
            name: "search".to_string(),
            content: "[]".to_string(),
        };
        let llm: Message = (&tool).into();
        assert_eq!(llm.role, MessageRole::Tool);
        assert_eq!(llm.tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(llm.content, "[]");

        let system: Message = (&ConversationMessage::system("rules")).into();
        assert_eq!(system.role, MessageRole::System);
        assert_eq!(system.content, "rules");
    }

    #[test]
    fn test_only_ai_is_ai() {
        assert!(ConversationMessage::ai("x").is_ai());
        assert!(!ConversationMessage::human("x").is_ai());
        assert!(!ConversationMessage::system("x").is_ai());
    }
}
