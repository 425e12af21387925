//! Agent assembly: settings plus credentials in, ready `ReactAgent` out.

use tracing::info;

use legalchat_core::agent::react::ReactAgent;
use legalchat_core::llm::box_provider::BoxLlmProvider;
use legalchat_core::tool::BoxAgentTool;
use legalchat_core::tool::search::SearchTool;
use legalchat_types::config::AgentSettings;
use legalchat_types::error::ConfigError;

use crate::credentials::Credentials;
use crate::llm::openai::OpenAiProvider;
use crate::search::tavily::TavilyClient;

/// Build the OpenAI-backed agent with the Tavily search tool attached.
///
/// Fails when a setting is out of range or an HTTP client cannot be built.
pub fn build_agent(settings: &AgentSettings, credentials: &Credentials) -> Result<ReactAgent, ConfigError> {
    validate(settings)?;

    let provider = OpenAiProvider::new(
        credentials.openai_api_key.clone(),
        settings.model.clone(),
        settings.openai_base_url.clone(),
    )?;
    let search = TavilyClient::new(credentials.tavily_api_key.clone(), settings.tavily_base_url.clone())?;
    let tool = SearchTool::new(search, settings.search_max_results);

    let agent = ReactAgent::new(BoxLlmProvider::new(provider), settings).with_tool(BoxAgentTool::new(tool));

    info!(
        provider = agent.provider_name(),
        model = %settings.model,
        tools = ?agent.tool_names(),
        "agent ready"
    );
    Ok(agent)
}

fn validate(settings: &AgentSettings) -> Result<(), ConfigError> {
    if settings.model.trim().is_empty() {
        return Err(ConfigError::Invalid {
            name: "model",
            message: "must not be empty".to_string(),
        });
    }
    if !(0.0..=2.0).contains(&settings.temperature) {
        return Err(ConfigError::Invalid {
            name: "temperature",
            message: format!("{} is outside 0.0..=2.0", settings.temperature),
        });
    }
    if settings.max_tokens == 0 {
        return Err(ConfigError::Invalid {
            name: "max_tokens",
            message: "must be at least 1".to_string(),
        });
    }
    if settings.search_max_results == 0 {
        return Err(ConfigError::Invalid {
            name: "search_max_results",
            message: "must be at least 1".to_string(),
        });
    }
    if settings.max_steps == 0 {
        return Err(ConfigError::Invalid {
            name: "max_steps",
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
