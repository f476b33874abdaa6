//! The instruction-to-reply loop over model and tools.

use std::sync::Arc;

use async_trait::async_trait;
use kite_agents_core::{Agent, AgentConfig, AgentError, AgentReply};
use kite_agents_mcp::{McpClient, McpError, ToolDefinition};

use crate::openai::{
    ChatCompletionRequest, ChatMessage, ModelClient, OpenAiClient, Tool, ToolCall,
};

/// Upper bound on model/tool round-trips per instruction. Reaching it
/// means the model never produced a final answer.
const MAX_TOOL_ROUNDS: usize = 8;

/// Trait for tools executed in-process rather than on the MCP server.
#[async_trait]
pub trait LocalTool: Send + Sync {
    /// Definition advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool.
    ///
    /// # Errors
    /// Returns [`AgentError::Tool`] if the tool fails.
    async fn call(&self, arguments: serde_json::Value) -> Result<String, AgentError>;
}

/// Conversational agent wired to the Kite MCP server.
///
/// Each `invoke` seeds a fresh conversation with the system instructions,
/// then alternates model calls and tool dispatch until the model answers
/// in plain text.
pub struct KiteAgent {
    model: Arc<dyn ModelClient>,
    mcp: Arc<dyn McpClient>,
    local_tools: Vec<Arc<dyn LocalTool>>,
    model_name: String,
    instructions: String,
}

impl KiteAgent {
    /// Create an agent from explicit parts.
    #[must_use]
    pub fn new(
        model: Arc<dyn ModelClient>,
        mcp: Arc<dyn McpClient>,
        model_name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            model,
            mcp,
            local_tools: Vec::new(),
            model_name: model_name.into(),
            instructions: instructions.into(),
        }
    }

    /// Create an agent from runtime configuration, constructing the
    /// default HTTP model client.
    #[must_use]
    pub fn from_config(
        config: &AgentConfig,
        mcp: Arc<dyn McpClient>,
        instructions: impl Into<String>,
    ) -> Self {
        let model = Arc::new(OpenAiClient::new(
            config.api_key.clone(),
            !config.disable_telemetry,
        ));
        Self::new(model, mcp, config.model.clone(), instructions)
    }

    /// Register a tool executed in-process.
    #[must_use]
    pub fn with_local_tool(mut self, tool: Arc<dyn LocalTool>) -> Self {
        self.local_tools.push(tool);
        self
    }

    /// All tools advertised to the model: the server's plus local ones.
    fn advertised_tools(&self) -> Vec<Tool> {
        self.mcp
            .tools()
            .iter()
            .cloned()
            .chain(self.local_tools.iter().map(|t| t.definition()))
            .map(|def| Tool::function(def.name, def.description, def.input_schema))
            .collect()
    }

    /// Dispatch one tool call, local tools first.
    async fn dispatch(&self, call: &ToolCall) -> Result<String, AgentError> {
        let name = call.function.name.as_str();
        let arguments: serde_json::Value = if call.function.arguments.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&call.function.arguments)
                .map_err(|e| AgentError::Tool(format!("invalid arguments for {name}: {e}")))?
        };

        if let Some(tool) = self
            .local_tools
            .iter()
            .find(|t| t.definition().name == name)
        {
            tracing::debug!(tool = name, "dispatching local tool");
            return tool.call(arguments).await;
        }

        tracing::debug!(tool = name, "dispatching mcp tool");
        match self.mcp.call_tool(name, arguments).await {
            // A tool that ran but reported failure carries the remote
            // description; session loss is classified from it here.
            Ok(result) if result.is_error => Err(AgentError::classify_remote(result.text())),
            Ok(result) => Ok(result.text()),
            Err(McpError::JsonRpc { code, message }) => Err(AgentError::classify_remote(format!(
                "JSON-RPC error {code}: {message}"
            ))),
            Err(err) => Err(AgentError::Transport(err.to_string())),
        }
    }
}

#[async_trait]
impl Agent for KiteAgent {
    async fn invoke(&self, instruction: &str) -> Result<AgentReply, AgentError> {
        let mut messages = vec![
            ChatMessage::system(self.instructions.as_str()),
            ChatMessage::user(instruction),
        ];
        let tools = self.advertised_tools();
        let tools = (!tools.is_empty()).then_some(tools);

        for round in 0..MAX_TOOL_ROUNDS {
            let request = ChatCompletionRequest {
                model: self.model_name.clone(),
                messages: messages.clone(),
                tools: tools.clone(),
            };
            let response = self.model.chat(&request).await?;
            let message = response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| AgentError::Model("response carried no choices".into()))?
                .message;

            let calls = message.tool_calls.clone().unwrap_or_default();
            if calls.is_empty() {
                return Ok(message.content.unwrap_or_default());
            }

            tracing::debug!(round, calls = calls.len(), "model requested tools");
            messages.push(message);
            for call in &calls {
                let output = self.dispatch(call).await?;
                messages.push(ChatMessage::tool(call.id.clone(), output));
            }
        }

        Err(AgentError::Model(format!(
            "no final answer after {MAX_TOOL_ROUNDS} tool rounds"
        )))
    }
}
