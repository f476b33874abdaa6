//! Conversational agent executor.
//!
//! Provides:
//! - `OpenAiClient` - Chat-completions client with tool calling
//! - `KiteAgent` - The instruction-to-reply loop over model and tools
//! - `PortfolioMetricsTool` - Local placeholder metrics tool

pub mod agent;
pub mod metrics;
pub mod openai;

pub use agent::{KiteAgent, LocalTool};
pub use metrics::PortfolioMetricsTool;
pub use openai::{ModelClient, OpenAiClient};
