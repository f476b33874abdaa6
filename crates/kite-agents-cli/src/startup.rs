//! Argument parsing and common process setup.

use clap::Parser;
use kite_agents_core::{AgentConfig, ConfigError};
use tracing_subscriber::EnvFilter;

/// Arguments shared by every binary. Environment variables provide the
/// same settings; flags win when both are present.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// Kite MCP endpoint URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model used for agent reasoning.
    #[arg(long)]
    pub model: Option<String>,

    /// Suppress payload-level diagnostic logging.
    #[arg(long)]
    pub disable_telemetry: bool,
}

impl CommonArgs {
    /// Resolve the runtime configuration: environment first, then flag
    /// overrides.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if required configuration is missing.
    pub fn into_config(self) -> Result<AgentConfig, ConfigError> {
        let mut config = AgentConfig::from_env()?;
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        config.disable_telemetry |= self.disable_telemetry;
        Ok(config)
    }
}

/// Install the global tracing subscriber. `RUST_LOG` controls the filter;
/// default is `warn` so agent output stays readable on the terminal.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
