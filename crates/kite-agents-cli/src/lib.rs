//! Interactive Kite assistant binaries.
//!
//! Provides:
//! - `repl` - The read-eval-print loop shared by the interactive binaries
//! - `instructions` - System prompts for each assistant flavor
//! - `startup` - Argument parsing and common process setup

pub mod instructions;
pub mod repl;
pub mod startup;
