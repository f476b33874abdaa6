//! OpenAI-compatible chat-completions client with tool calling.

use async_trait::async_trait;
use kite_agents_core::AgentError;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// A tool-result message answering one tool call.
    #[must_use]
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool call requested by the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// Function name and raw JSON arguments of a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// A tool advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: ToolFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolFunction {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl Tool {
    /// Wrap a function schema as an advertised tool.
    #[must_use]
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: ToolFunction {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Request body for `/v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// Response body of `/v1/chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Trait for model backends.
///
/// The HTTP client is behind this seam so the agent loop can be exercised
/// against a scripted model.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one chat completion.
    ///
    /// # Errors
    /// Returns [`AgentError::Model`] if the request fails or the response
    /// does not parse.
    async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AgentError>;
}

/// HTTP client for an OpenAI-compatible completions API.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Payload-level logging of model requests and replies. Off when
    /// telemetry is disabled.
    log_payloads: bool,
}

impl OpenAiClient {
    /// Create a client against the default API endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>, log_payloads: bool) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, log_payloads)
    }

    /// Create a client against a custom base URL.
    #[must_use]
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        log_payloads: bool,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            log_payloads,
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AgentError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        if self.log_payloads {
            tracing::debug!(model = %request.model, messages = request.messages.len(), "model request");
        }

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AgentError::Model(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::Model(format!("read body: {e}")))?;
        if !status.is_success() {
            return Err(AgentError::Model(format!("API error {status}: {body}")));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AgentError::Model(format!("parse response: {e}")))?;
        if self.log_payloads {
            tracing::debug!(choices = parsed.choices.len(), "model response");
        }
        Ok(parsed)
    }
}
