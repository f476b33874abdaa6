//! HTTP+SSE transport for MCP.
//!
//! The server is reached with a long-lived GET whose event stream carries
//! every JSON-RPC response; requests are POSTed to a session-scoped
//! endpoint announced as the first event on the stream.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Url;
use tokio::sync::oneshot;

use crate::client::{
    CallToolResult, InitializeResult, McpClient, McpError, ServerInfo, ToolDefinition,
};
use crate::jsonrpc;

const PROTOCOL_VERSION: &str = "2024-11-05";
const CLIENT_NAME: &str = "kite-agents";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<jsonrpc::Response>>>>;

/// MCP client speaking JSON-RPC 2.0 over the HTTP+SSE transport.
pub struct SseMcpClient {
    http: reqwest::Client,
    post_url: Url,
    next_id: AtomicU64,
    pending: Pending,
    tools: Vec<ToolDefinition>,
    server_info: ServerInfo,
    instructions: Option<String>,
    reader: tokio::task::JoinHandle<()>,
}

impl SseMcpClient {
    /// Connect to an MCP server and perform the initialize handshake.
    ///
    /// # Errors
    /// Returns [`McpError::Transport`] if the stream cannot be opened or
    /// ends before the endpoint announcement, and [`McpError::Protocol`]
    /// if the handshake responses do not parse.
    pub async fn connect(url: &str) -> Result<Self, McpError> {
        let base = Url::parse(url).map_err(|e| McpError::Transport(format!("invalid url: {e}")))?;
        let http = reqwest::Client::new();

        let response = http
            .get(base.clone())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| McpError::Transport(format!("failed to open stream: {e}")))?
            .error_for_status()
            .map_err(|e| McpError::Transport(format!("stream rejected: {e}")))?;

        let mut events = Box::pin(response.bytes_stream().eventsource());

        // The first event on the stream announces the session-scoped URL
        // that requests must be POSTed to.
        let post_url = loop {
            match events.next().await {
                Some(Ok(event)) if event.event == "endpoint" => {
                    break resolve_endpoint(&base, &event.data)?;
                }
                Some(Ok(event)) => {
                    tracing::trace!(kind = %event.event, "ignoring pre-endpoint event");
                }
                Some(Err(e)) => {
                    return Err(McpError::Transport(format!("stream error: {e}")));
                }
                None => {
                    return Err(McpError::Transport(
                        "stream ended before endpoint announcement".into(),
                    ));
                }
            }
        };
        tracing::debug!(%post_url, "mcp endpoint announced");

        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let reader = tokio::spawn(read_loop(events, Arc::clone(&pending)));

        let mut client = Self {
            http,
            post_url,
            next_id: AtomicU64::new(1),
            pending,
            tools: Vec::new(),
            server_info: ServerInfo::default(),
            instructions: None,
            reader,
        };

        let init_params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": { "name": CLIENT_NAME, "version": CLIENT_VERSION }
        });
        let init_value = client.request("initialize", Some(init_params)).await?;
        let init: InitializeResult = serde_json::from_value(init_value)
            .map_err(|e| McpError::Protocol(format!("failed to parse initialize result: {e}")))?;
        if init.protocol_version != PROTOCOL_VERSION {
            tracing::warn!(
                negotiated = %init.protocol_version,
                expected = %PROTOCOL_VERSION,
                "MCP protocol version mismatch"
            );
        }
        client.server_info = init.server_info;
        client.instructions = init.instructions;

        client.notify("notifications/initialized", None).await?;
        client.tools = client.fetch_all_tools().await?;
        tracing::info!(
            server = %client.server_info.name,
            tools = client.tools.len(),
            "mcp session established"
        );

        Ok(client)
    }

    /// Fetch all tools, following pagination cursors.
    async fn fetch_all_tools(&self) -> Result<Vec<ToolDefinition>, McpError> {
        let mut all_tools = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = cursor.as_ref().map(|c| serde_json::json!({ "cursor": c }));
            let result = self.request("tools/list", params).await?;

            let tools: Vec<ToolDefinition> = serde_json::from_value(
                result
                    .get("tools")
                    .cloned()
                    .unwrap_or(serde_json::Value::Array(vec![])),
            )
            .map_err(|e| McpError::Protocol(format!("failed to parse tools/list: {e}")))?;
            all_tools.extend(tools);

            match result.get("nextCursor").and_then(|v| v.as_str()) {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }

        Ok(all_tools)
    }

    async fn request(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, McpError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert(id, tx);

        let req = jsonrpc::Request::new(id, method, params);
        let posted = self
            .http
            .post(self.post_url.clone())
            .json(&req)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);
        if let Err(e) = posted {
            self.pending.lock().unwrap().remove(&id);
            return Err(McpError::Transport(format!("post failed: {e}")));
        }

        let response = rx
            .await
            .map_err(|_| McpError::Transport("stream closed before response".into()))?;

        if let Some(err) = response.error {
            return Err(McpError::JsonRpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(response.result.unwrap_or(serde_json::Value::Null))
    }

    async fn notify(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<(), McpError> {
        let note = jsonrpc::Notification::new(method, params);
        self.http
            .post(self.post_url.clone())
            .json(&note)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| McpError::Transport(format!("post failed: {e}")))?;
        Ok(())
    }

    /// Server identity from initialization.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }
}

impl Drop for SseMcpClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl McpClient for SseMcpClient {
    fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, McpError> {
        let params = serde_json::json!({ "name": name, "arguments": arguments });
        let result = self.request("tools/call", Some(params)).await?;
        serde_json::from_value(result)
            .map_err(|e| McpError::Protocol(format!("failed to parse tools/call result: {e}")))
    }
}

/// Resolve the POSTable endpoint announced on the stream against the SSE
/// base URL. Servers send either an absolute URL or a path.
fn resolve_endpoint(base: &Url, data: &str) -> Result<Url, McpError> {
    base.join(data.trim())
        .map_err(|e| McpError::Protocol(format!("invalid endpoint announcement {data:?}: {e}")))
}

/// Pump the SSE stream, resolving pending requests by JSON-RPC id.
async fn read_loop<S, E>(mut events: S, pending: Pending)
where
    S: futures::Stream<Item = Result<eventsource_stream::Event, eventsource_stream::EventStreamError<E>>>
        + Unpin,
    E: std::fmt::Display,
{
    while let Some(next) = events.next().await {
        let event = match next {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("mcp stream error: {e}");
                break;
            }
        };
        if event.event != "message" {
            tracing::trace!(kind = %event.event, "ignoring event");
            continue;
        }
        let Ok(response) = serde_json::from_str::<jsonrpc::Response>(&event.data) else {
            // Server-initiated requests and notifications are not part of
            // this client's surface.
            tracing::trace!("ignoring non-response message");
            continue;
        };
        let Some(id) = response.id.as_ref().and_then(jsonrpc::Id::as_number) else {
            continue;
        };
        let waiter = pending.lock().unwrap().remove(&id);
        match waiter {
            Some(tx) => {
                let _ = tx.send(response);
            }
            None => tracing::debug!(id, "response for unknown request"),
        }
    }
    // Dropping the senders wakes every in-flight request with an error.
    pending.lock().unwrap().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_endpoint_resolves_against_base() {
        let base = Url::parse("https://mcp.kite.trade/sse").unwrap();
        let url = resolve_endpoint(&base, "/messages?sessionId=abc").unwrap();
        assert_eq!(url.as_str(), "https://mcp.kite.trade/messages?sessionId=abc");
    }

    #[test]
    fn absolute_endpoint_is_used_as_is() {
        let base = Url::parse("https://mcp.kite.trade/sse").unwrap();
        let url = resolve_endpoint(&base, "https://other.kite.trade/messages").unwrap();
        assert_eq!(url.as_str(), "https://other.kite.trade/messages");
    }

    #[tokio::test]
    async fn read_loop_resolves_pending_by_id() {
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().unwrap().insert(3, tx);

        let events = futures::stream::iter(vec![Ok::<_, eventsource_stream::EventStreamError<
            std::convert::Infallible,
        >>(eventsource_stream::Event {
            event: "message".into(),
            data: r#"{"jsonrpc":"2.0","id":3,"result":{"ok":true}}"#.into(),
            ..Default::default()
        })]);
        read_loop(events, Arc::clone(&pending)).await;

        let response = rx.await.unwrap();
        assert_eq!(response.result.unwrap()["ok"], true);
        assert!(pending.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_loop_drops_pending_on_stream_end() {
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().unwrap().insert(1, tx);

        let events = futures::stream::iter(Vec::<
            Result<eventsource_stream::Event, eventsource_stream::EventStreamError<std::convert::Infallible>>,
        >::new());
        read_loop(events, Arc::clone(&pending)).await;

        assert!(rx.await.is_err());
    }
}
