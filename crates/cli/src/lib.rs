//! MCP Eval CLI Library
//!
//! This library provides the command implementations and terminal output
//! formatting for the `mcp-eval` binary.

pub mod commands;
pub mod output;

pub use output::TableFormatter;

/// Re-export common types
pub use anyhow::{Context, Result};
