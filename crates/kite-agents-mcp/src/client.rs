//! MCP protocol types and the client trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MCP client error.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i32, message: String },
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Server identity reported during initialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Result of the `initialize` handshake.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    #[serde(default)]
    pub server_info: ServerInfo,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// A tool advertised by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_schema")]
    pub input_schema: serde_json::Value,
}

fn default_schema() -> serde_json::Value {
    serde_json::json!({"type": "object"})
}

/// Result of a `tools/call` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<Content>,
    #[serde(default)]
    pub is_error: bool,
}

impl CallToolResult {
    /// All text content joined into one string. Non-text content is
    /// skipped.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                Content::Text { text } => Some(text.as_str()),
                Content::Unknown => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single content block in a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Unknown,
}

/// Trait for MCP clients.
///
/// The transport is behind this seam so the agent loop can be exercised
/// against an in-memory server.
#[async_trait]
pub trait McpClient: Send + Sync {
    /// Tool definitions this server provides.
    fn tools(&self) -> &[ToolDefinition];

    /// Optional instructions from the server, for system-prompt context.
    fn instructions(&self) -> Option<&str>;

    /// Execute a tool call.
    ///
    /// # Errors
    /// Returns [`McpError`] if the transport or the server fails. A tool
    /// that ran but reported failure comes back as `Ok` with
    /// [`CallToolResult::is_error`] set.
    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, McpError>;
}
