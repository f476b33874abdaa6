//! Session-aware retry orchestration for Kite agents.
//!
//! Provides:
//! - `SessionRetryExecutor` - Bounded login-then-retry around agent calls
//! - `RetryOutcome` - Terminal outcome of one executed command

pub mod executor;

pub use executor::{RetryOutcome, SessionRetryExecutor};
