//! MCP client over the HTTP+SSE transport.
//!
//! Provides:
//! - JSON-RPC 2.0 wire types
//! - MCP protocol types (tools, results, initialization)
//! - `SseMcpClient` - the streaming transport to the Kite MCP server

pub mod client;
pub mod jsonrpc;
pub mod sse;

pub use client::{CallToolResult, Content, McpClient, McpError, ServerInfo, ToolDefinition};
pub use sse::SseMcpClient;
