//! Runtime configuration.
//!
//! Replaces scattered environment lookups with one explicit structure
//! passed to construction. Only the presence of the API key is validated
//! here; everything else has a default.

use thiserror::Error;

/// Default Kite MCP server endpoint (SSE).
pub const DEFAULT_ENDPOINT: &str = "https://mcp.kite.trade/sse";

/// Default model for agent reasoning.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Environment variable carrying the model API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the MCP endpoint.
pub const ENDPOINT_VAR: &str = "KITE_MCP_URL";

/// Environment variable overriding the model name.
pub const MODEL_VAR: &str = "KITE_AGENTS_MODEL";

/// Environment variable suppressing payload-level diagnostic logging.
pub const DISABLE_TELEMETRY_VAR: &str = "KITE_AGENTS_DISABLE_TELEMETRY";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0} is not set")]
    MissingApiKey(&'static str),
}

/// Agent runtime configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Credential for remote model calls.
    pub api_key: String,
    /// Remote MCP service endpoint URL.
    pub endpoint: String,
    /// Model name sent with every completion request.
    pub model: String,
    /// Suppress outbound diagnostic reporting of model and tool payloads.
    pub disable_telemetry: bool,
}

impl AgentConfig {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingApiKey`] if the API key variable is
    /// unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingApiKey`] if the API key is absent or
    /// empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        let endpoint = lookup(ENDPOINT_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let model = lookup(MODEL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let disable_telemetry = lookup(DISABLE_TELEMETRY_VAR)
            .is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes"));

        Ok(Self {
            api_key,
            endpoint,
            model,
            disable_telemetry,
        })
    }
}
