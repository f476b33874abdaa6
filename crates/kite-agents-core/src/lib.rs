//! Core abstractions for Kite conversational agent sessions.
//!
//! This crate provides the fundamental building blocks:
//! - `Agent` - The agent invocation boundary
//! - `AgentError` - Typed invocation failures (including session loss)
//! - `AgentConfig` - Explicit runtime configuration

pub mod agent;
pub mod config;

pub use agent::{Agent, AgentError, AgentReply};
pub use config::{AgentConfig, ConfigError};
