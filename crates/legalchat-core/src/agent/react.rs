//! ReAct-style tool-calling agent.
//!
//! Each step sends the running message sequence (with tool definitions bound)
//! to the model. A reply that requests tools is followed by one tool result
//! message per call and another step; a reply without tool calls ends the
//! run. The returned sequence is the input followed by everything generated.

use tracing::{Instrument, debug, info, info_span, warn};

use legalchat_types::chat::ConversationMessage;
use legalchat_types::config::AgentSettings;
use legalchat_types::error::AgentError;
use legalchat_types::llm::{CompletionRequest, Message, ToolCall};

use crate::llm::box_provider::BoxLlmProvider;
use crate::tool::BoxAgentTool;

use super::ReasoningAgent;

/// Tool-calling agent over an LLM provider.
pub struct ReactAgent {
    provider: BoxLlmProvider,
    tools: Vec<BoxAgentTool>,
    model: String,
    temperature: f64,
    max_tokens: u32,
    max_steps: u32,
}

impl ReactAgent {
    /// Create an agent with no tools, using the model parameters from `settings`.
    pub fn new(provider: BoxLlmProvider, settings: &AgentSettings) -> Self {
        Self {
            provider,
            tools: Vec::new(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            max_steps: settings.max_steps.max(1),
        }
    }

    /// Bind a tool the model may call.
    pub fn with_tool(mut self, tool: BoxAgentTool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Token budget is clamped to the provider's output limit; tools are
    /// only bound when the provider supports tool calling.
    fn build_request(&self, messages: &[ConversationMessage]) -> CompletionRequest {
        let capabilities = self.provider.capabilities();
        let tools = if capabilities.tool_calling {
            self.tools.iter().map(|t| t.definition().clone()).collect()
        } else {
            Vec::new()
        };

        CompletionRequest {
            model: self.model.clone(),
            messages: messages.iter().map(Message::from).collect(),
            max_tokens: self.max_tokens.min(capabilities.max_output_tokens),
            temperature: Some(self.temperature),
            tools,
        }
    }

    /// Execute one tool call. Failures become the tool's output so the model
    /// can see them and answer anyway.
    async fn run_tool(&self, call: &ToolCall) -> ConversationMessage {
        let content = match self.tools.iter().find(|t| t.name() == call.name) {
            Some(tool) => {
                debug!(tool = %call.name, arguments = %call.arguments, "calling tool");
                match tool.call(&call.arguments).await {
                    Ok(output) => output,
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "tool call failed");
                        format!("Error: {e}")
                    }
                }
            }
            None => {
                warn!(tool = %call.name, "model requested an unknown tool");
                format!(
                    "Error: {} is not a valid tool, try one of [{}].",
                    call.name,
                    self.tool_names().join(", ")
                )
            }
        };

        ConversationMessage::Tool {
            tool_call_id: call.id.clone(),
            name: call.name.clone(),
            content,
        }
    }
}

impl ReasoningAgent for ReactAgent {
    async fn invoke(
        &self,
        mut messages: Vec<ConversationMessage>,
    ) -> Result<Vec<ConversationMessage>, AgentError> {
        for step in 1..=self.max_steps {
            let request = self.build_request(&messages);

            let span = info_span!(
                "gen_ai.chat",
                gen_ai.operation.name = "chat",
                gen_ai.provider.name = self.provider.name(),
                gen_ai.request.model = %request.model,
                gen_ai.request.max_tokens = request.max_tokens,
                gen_ai.request.temperature = ?request.temperature,
                agent.step = step,
            );

            let response = self.provider.complete(&request).instrument(span).await?;

            info!(
                step,
                stop_reason = %response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                tool_calls = response.tool_calls.len(),
                "model step complete"
            );

            let tool_calls = response.tool_calls;
            messages.push(ConversationMessage::Ai {
                content: response.content,
                tool_calls: tool_calls.clone(),
            });

            if tool_calls.is_empty() {
                return Ok(messages);
            }

            for call in &tool_calls {
                let result = self.run_tool(call).await;
                messages.push(result);
            }
        }

        Err(AgentError::StepLimitExceeded(self.max_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use legalchat_types::error::SearchError;
    use legalchat_types::llm::{
        CompletionResponse, LlmError, MessageRole, ProviderCapabilities, StopReason, Usage,
    };

    use crate::llm::provider::LlmProvider;
    use crate::tool::search::{SEARCH_TOOL_NAME, SearchResult, SearchTool, WebSearch};

    // --- Scripted provider ---

    /// Replays queued responses and records every request it receives.
    struct ScriptedProvider {
        capabilities: ProviderCapabilities,
        responses: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl ScriptedProvider {
        fn new(
            responses: Vec<Result<CompletionResponse, LlmError>>,
        ) -> (Self, Arc<Mutex<Vec<CompletionRequest>>>) {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let provider = Self {
                capabilities: ProviderCapabilities {
                    tool_calling: true,
                    max_output_tokens: 4_096,
                },
                responses: Mutex::new(responses.into()),
                requests: Arc::clone(&requests),
            };
            (provider, requests)
        }

        fn with_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
            self.capabilities = capabilities;
            self
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(text_reply("script exhausted")))
        }
    }

    fn text_reply(content: &str) -> CompletionResponse {
        CompletionResponse {
            id: "resp-text".to_string(),
            content: content.to_string(),
            tool_calls: Vec::new(),
            model: "gpt-3.5-turbo".to_string(),
            stop_reason: StopReason::EndTurn,
            usage: Usage {
                input_tokens: 12,
                output_tokens: 8,
            },
        }
    }

    fn tool_reply(name: &str, arguments: serde_json::Value) -> CompletionResponse {
        CompletionResponse {
            id: "resp-tool".to_string(),
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: name.to_string(),
                arguments,
            }],
            model: "gpt-3.5-turbo".to_string(),
            stop_reason: StopReason::ToolUse,
            usage: Usage::default(),
        }
    }

    struct StaticSearch;

    impl WebSearch for StaticSearch {
        async fn search(&self, query: &str, _max_results: u32) -> Result<Vec<SearchResult>, SearchError> {
            Ok(vec![SearchResult {
                url: "https://law.go.kr/lsInfoP.do".to_string(),
                content: format!("result for {query}"),
            }])
        }
    }

    fn agent(provider: ScriptedProvider, settings: &AgentSettings) -> ReactAgent {
        ReactAgent::new(BoxLlmProvider::new(provider), settings)
            .with_tool(BoxAgentTool::new(SearchTool::new(StaticSearch, 1)))
    }

    #[tokio::test]
    async fn test_plain_answer_ends_after_one_step() {
        let (provider, requests) = ScriptedProvider::new(vec![Ok(text_reply("민법 제618조입니다."))]);
        let agent = agent(provider, &AgentSettings::default());

        let input = vec![
            ConversationMessage::system("rules"),
            ConversationMessage::human("임대차란?"),
        ];
        let output = agent.invoke(input.clone()).await.unwrap();

        assert_eq!(output.len(), 3);
        assert_eq!(&output[..2], &input[..]);
        assert_eq!(output[2], ConversationMessage::ai("민법 제618조입니다."));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_settings_and_tools() {
        let (provider, requests) = ScriptedProvider::new(vec![Ok(text_reply("ok"))]);
        let settings = AgentSettings {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 256,
            ..AgentSettings::default()
        };
        let agent = agent(provider, &settings);

        agent
            .invoke(vec![ConversationMessage::system("rules"), ConversationMessage::human("q")])
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.tools[0].name, SEARCH_TOOL_NAME);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_request_respects_provider_capabilities() {
        let (provider, requests) = ScriptedProvider::new(vec![Ok(text_reply("ok"))]);
        let provider = provider.with_capabilities(ProviderCapabilities {
            tool_calling: false,
            max_output_tokens: 512,
        });
        let agent = agent(provider, &AgentSettings::default());

        agent.invoke(vec![ConversationMessage::human("q")]).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].max_tokens, 512);
        assert!(requests[0].tools.is_empty());
    }

    #[tokio::test]
    async fn test_tool_call_runs_tool_and_loops() {
        let (provider, requests) = ScriptedProvider::new(vec![
            Ok(tool_reply(SEARCH_TOOL_NAME, serde_json::json!({"query": "전세 보증금 반환"}))),
            Ok(text_reply("주택임대차보호법에 따라 반환받을 수 있습니다.")),
        ]);
        let agent = agent(provider, &AgentSettings::default());

        let output = agent
            .invoke(vec![ConversationMessage::human("전세 보증금을 못 받았어요")])
            .await
            .unwrap();

        // human, ai(tool call), tool, ai(final)
        assert_eq!(output.len(), 4);
        match &output[2] {
            ConversationMessage::Tool {
                tool_call_id,
                name,
                content,
            } => {
                assert_eq!(tool_call_id, "call_1");
                assert_eq!(name, SEARCH_TOOL_NAME);
                assert!(content.contains("result for 전세 보증금 반환"));
            }
            other => panic!("expected tool message, got {other:?}"),
        }
        assert_eq!(
            output.last().unwrap().content(),
            "주택임대차보호법에 따라 반환받을 수 있습니다."
        );

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let second = &requests[1];
        assert_eq!(second.messages.len(), 3);
        assert_eq!(second.messages[1].tool_calls.len(), 1);
        assert_eq!(second.messages[2].role, MessageRole::Tool);
        assert_eq!(second.messages[2].tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let (provider, _requests) = ScriptedProvider::new(vec![
            Ok(tool_reply("calculator", serde_json::json!({"expr": "1+1"}))),
            Ok(text_reply("done")),
        ]);
        let agent = agent(provider, &AgentSettings::default());

        let output = agent
            .invoke(vec![ConversationMessage::human("q")])
            .await
            .unwrap();

        assert!(output[2].content().contains("calculator is not a valid tool"));
        assert!(output[2].content().contains(SEARCH_TOOL_NAME));
        assert_eq!(output.last().unwrap().content(), "done");
    }

    #[tokio::test]
    async fn test_tool_failure_is_reported_to_model() {
        let (provider, _requests) = ScriptedProvider::new(vec![
            Ok(tool_reply(SEARCH_TOOL_NAME, serde_json::json!({"wrong": 1}))),
            Ok(text_reply("answered without search")),
        ]);
        let agent = agent(provider, &AgentSettings::default());

        let output = agent
            .invoke(vec![ConversationMessage::human("q")])
            .await
            .unwrap();

        assert!(output[2].content().starts_with("Error: invalid arguments"));
        assert_eq!(output.last().unwrap().content(), "answered without search");
    }

    #[tokio::test]
    async fn test_step_limit() {
        let looping = (0..5)
            .map(|_| Ok(tool_reply(SEARCH_TOOL_NAME, serde_json::json!({"query": "again"}))))
            .collect();
        let (provider, requests) = ScriptedProvider::new(looping);
        let settings = AgentSettings {
            max_steps: 2,
            ..AgentSettings::default()
        };
        let agent = agent(provider, &settings);

        let err = agent
            .invoke(vec![ConversationMessage::human("q")])
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::StepLimitExceeded(2)));
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let (provider, _requests) = ScriptedProvider::new(vec![Err(LlmError::AuthenticationFailed)]);
        let agent = agent(provider, &AgentSettings::default());

        let err = agent
            .invoke(vec![ConversationMessage::human("q")])
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Llm(LlmError::AuthenticationFailed)));
    }

    #[test]
    fn test_tool_names() {
        let (provider, _requests) = ScriptedProvider::new(Vec::new());
        let agent = agent(provider, &AgentSettings::default());
        assert_eq!(agent.tool_names(), vec![SEARCH_TOOL_NAME]);
        assert_eq!(agent.provider_name(), "scripted");
    }
}
