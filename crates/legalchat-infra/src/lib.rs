//! Infrastructure for legalchat: concrete HTTP clients behind the core
//! traits, credential loading, and the factory that wires them into a
//! ready-to-use reasoning agent.

pub mod credentials;
pub mod factory;
pub mod llm;
pub mod search;
