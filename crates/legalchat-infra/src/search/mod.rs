//! Web search backends.

pub mod tavily;
