//! Conversation handling for legalchat.
//!
//! `ConversationService` turns a question plus its history into one answer
//! and records the turn; `SessionStore` keeps one history per session for
//! the HTTP facade.

pub mod service;
pub mod store;
