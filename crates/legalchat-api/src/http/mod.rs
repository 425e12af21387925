//! HTTP API for legalchat.
//!
//! `GET /` for liveness and `POST /chat` speaking the chat-UI envelope.

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod router;
