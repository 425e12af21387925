//! Business logic and port traits for legalchat.
//!
//! This crate defines the traits the infrastructure layer implements
//! (`LlmProvider`, `WebSearch`) together with the logic built on top of them:
//! the tool-calling reasoning agent and the conversation service. It depends
//! only on `legalchat-types` -- never on `legalchat-infra` or any HTTP crate.

pub mod agent;
pub mod chat;
pub mod llm;
pub mod tool;
