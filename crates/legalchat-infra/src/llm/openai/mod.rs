//! OpenAiProvider -- [`LlmProvider`] for the OpenAI Chat Completions API.
//!
//! Sends non-streaming requests to `{base}/chat/completions` with function
//! tools attached. The API key is wrapped in [`secrecy::SecretString`] and
//! only exposed when building the `Authorization` header.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use legalchat_core::llm::provider::LlmProvider;
use legalchat_types::error::ConfigError;
use legalchat_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, ProviderCapabilities,
    StopReason, ToolCall, ToolDefinition, Usage,
};

use self::types::{
    OpenAiFunction, OpenAiFunctionCall, OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiTool,
    OpenAiToolCall,
};

/// OpenAI chat model provider.
///
/// Does not derive Debug so the key never reaches logs.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OpenAiProvider {
    /// Create a provider for `model` against `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(api_key: SecretString, model: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let model = model.into();
        let capabilities = Self::capabilities_for_model(&model);

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model,
            capabilities,
        })
    }

    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        if model.starts_with("gpt-3.5") {
            ProviderCapabilities {
                tool_calling: true,
                max_output_tokens: 4_096,
            }
        } else if model.starts_with("gpt-4o") || model.starts_with("gpt-4.1") {
            ProviderCapabilities {
                tool_calling: true,
                max_output_tokens: 16_384,
            }
        } else {
            // Conservative defaults for unknown models
            ProviderCapabilities {
                tool_calling: true,
                max_output_tokens: 4_096,
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAiRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        OpenAiRequest {
            model,
            messages: request.messages.iter().map(to_openai_message).collect(),
            max_completion_tokens: request.max_tokens,
            temperature: request.temperature,
            tools: request.tools.iter().map(to_openai_tool).collect(),
        }
    }
}

fn to_openai_message(message: &Message) -> OpenAiMessage {
    let content = if message.role == MessageRole::Assistant
        && message.content.is_empty()
        && !message.tool_calls.is_empty()
    {
        None
    } else {
        Some(message.content.clone())
    };

    OpenAiMessage {
        role: message.role.to_string(),
        content,
        tool_calls: message
            .tool_calls
            .iter()
            .map(|call| OpenAiToolCall {
                id: call.id.clone(),
                kind: "function".to_string(),
                function: OpenAiFunctionCall {
                    name: call.name.clone(),
                    arguments: encode_arguments(&call.arguments),
                },
            })
            .collect(),
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn to_openai_tool(tool: &ToolDefinition) -> OpenAiTool {
    OpenAiTool {
        kind: "function".to_string(),
        function: OpenAiFunction {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: tool.input_schema.clone(),
        },
    }
}

/// Arguments travel as a JSON string. A value kept as a raw string (because
/// the model sent malformed JSON) is echoed back unchanged.
fn encode_arguments(arguments: &serde_json::Value) -> String {
    match arguments {
        serde_json::Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

fn decode_arguments(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("tool_calls") | Some("function_call") => StopReason::ToolUse,
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        _ => StopReason::EndTurn,
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_openai_request(request);
        let url = self.url("/chat/completions");
        debug!(model = %body.model, messages = body.messages.len(), tools = body.tools.len(), "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000));
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(error_body),
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited { retry_after_ms },
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let openai_resp: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let choice = openai_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Deserialization("response has no choices".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: decode_arguments(&call.function.arguments),
            })
            .collect();

        let usage = openai_resp.usage.unwrap_or_default();

        Ok(CompletionResponse {
            id: openai_resp.id,
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            model: openai_resp.model,
            stop_reason: map_finish_reason(choice.finish_reason.as_deref()),
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}
