//! The agent invocation boundary.

use async_trait::async_trait;
use thiserror::Error;

/// Final textual output of the agent for one instruction.
pub type AgentReply = String;

/// Marker the Kite MCP server embeds in failures caused by a missing or
/// expired session. Matched case-sensitively, and only inside
/// [`AgentError::classify_remote`]; everything downstream works with the
/// typed variant instead.
pub const SESSION_LOST_MARKER: &str = "session not found";

/// Agent invocation error.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// The remote session is absent or expired. Recoverable by logging in
    /// again and retrying the instruction.
    #[error("not authenticated: {detail}")]
    Unauthenticated { detail: String },
    /// Model invocation failure.
    #[error("model error: {0}")]
    Model(String),
    /// Tool dispatch failure that is not a session loss.
    #[error("tool error: {0}")]
    Tool(String),
    /// Streaming transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl AgentError {
    /// Classify a failure description reported by the remote service.
    ///
    /// Session loss is only distinguishable by a fixed marker in the
    /// description, so the substring check lives here, at the boundary
    /// where remote failures enter the type system.
    #[must_use]
    pub fn classify_remote(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if detail.contains(SESSION_LOST_MARKER) {
            Self::Unauthenticated { detail }
        } else {
            Self::Tool(detail)
        }
    }

    /// Whether this failure signals a lost session.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }
}

/// Trait for conversational agents.
///
/// An agent turns one natural-language instruction into remote actions and
/// a natural-language result. This is the only boundary the session retry
/// executor consumes.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run one instruction to completion.
    ///
    /// # Errors
    /// Returns [`AgentError`] if the model, a tool, or the transport fails.
    async fn invoke(&self, instruction: &str) -> Result<AgentReply, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_marker_classifies_as_unauthenticated() {
        let err = AgentError::classify_remote("Error: session not found for user");
        assert!(err.is_unauthenticated());
    }

    #[test]
    fn other_failures_classify_as_tool_errors() {
        let err = AgentError::classify_remote("rate limit exceeded");
        assert!(!err.is_unauthenticated());
        assert!(matches!(err, AgentError::Tool(_)));
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        let err = AgentError::classify_remote("Session Not Found");
        assert!(!err.is_unauthenticated());
    }

    #[test]
    fn display_carries_the_detail() {
        let err = AgentError::Unauthenticated {
            detail: "session not found for user".into(),
        };
        assert_eq!(err.to_string(), "not authenticated: session not found for user");
    }
}
