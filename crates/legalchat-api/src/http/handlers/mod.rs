pub mod chat;
pub mod root;
