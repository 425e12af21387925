//! Request and response envelopes of the chat UI.
//!
//! A request carries the whole visible conversation; only the text of the
//! first part of the last message is used as the question.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Role the UI expects on assistant replies.
pub const MODEL_ROLE: &str = "model";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub parts: Vec<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub contents: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCandidate {
    pub content: ChatMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub candidates: Vec<ChatCandidate>,
}

impl ChatRequest {
    /// Text of the first part of the last message, or `""` when any level
    /// of that path is missing.
    pub fn query(&self) -> &str {
        self.contents
            .last()
            .and_then(|message| message.parts.first())
            .and_then(|part| part.get("text"))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl ChatResponse {
    /// Single-candidate response carrying `answer`.
    pub fn from_answer(answer: impl Into<String>) -> Self {
        let part = HashMap::from([("text".to_string(), answer.into())]);
        Self {
            candidates: vec![ChatCandidate {
                content: ChatMessage {
                    role: MODEL_ROLE.to_string(),
                    parts: vec![part],
                },
            }],
        }
    }
}
