//! Runtime settings for legalchat.
//!
//! `AgentSettings` controls how the reasoning agent talks to the model and
//! the search tool; `ServerSettings` controls the HTTP listener. Both are
//! filled from CLI flags / environment variables by the binary and default
//! to the values the service was designed around.

use serde::{Deserialize, Serialize};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default completion token budget per model call.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Default number of search results handed to the model.
pub const DEFAULT_SEARCH_MAX_RESULTS: u32 = 1;
/// Default cap on model calls within one agent invocation.
pub const DEFAULT_MAX_STEPS: u32 = 25;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
/// Default cap on concurrently retained HTTP sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
/// Default idle time after which an HTTP session is dropped.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

/// Where the system prompt is placed in the message sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptPlacement {
    /// Dedicated system-role message.
    #[default]
    System,
    /// System-role message followed by the same text as a user-role message.
    HumanMessage,
}

/// Reasoning agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub search_max_results: u32,
    pub max_steps: u32,
    pub openai_base_url: String,
    pub tavily_base_url: String,
    #[serde(default)]
    pub prompt_placement: PromptPlacement,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            search_max_results: DEFAULT_SEARCH_MAX_RESULTS,
            max_steps: DEFAULT_MAX_STEPS,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            tavily_base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            prompt_placement: PromptPlacement::System,
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_sessions: usize,
    pub session_idle_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

impl ServerSettings {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_settings_defaults() {
        let settings = AgentSettings::default();
        assert_eq!(settings.model, "gpt-3.5-turbo");
        assert!((settings.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(settings.max_tokens, 1024);
        assert_eq!(settings.search_max_results, 1);
        assert_eq!(settings.prompt_placement, PromptPlacement::System);
    }

    #[test]
    fn test_prompt_placement_serde() {
        let json = serde_json::to_string(&PromptPlacement::HumanMessage).unwrap();
        assert_eq!(json, "\"human_message\"");
    }

    #[test]
    fn test_server_bind_addr() {
        assert_eq!(ServerSettings::default().bind_addr(), "0.0.0.0:8000");
    }
}
