//! Shared domain types for legalchat.
//!
//! Conversation turns and histories, the messages exchanged with the
//! reasoning agent, LLM request/response shapes, settings, and error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
