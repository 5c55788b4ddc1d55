//! Infrastructure layer for the MCP eval toolkit.
//!
//! This crate provides the concrete endpoint implementations behind the
//! application layer's ports:
//! - Chat completions over HTTP against any OpenAI-compatible endpoint,
//!   Azure deployments included
//! - Tool listing and invocation against an MCP server, over stdio or SSE
//! - Test settings discovery from `.testsettings.json` files
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mcp_eval_infrastructure::{McpToolEndpoint, OpenAiChatClient};
//!
//! let chat = OpenAiChatClient::new(config.chat.clone())?;
//! let tools = McpToolEndpoint::new(config.tools.clone());
//! let service = EvaluationService::new(Arc::new(chat), Arc::new(tools), &config);
//! ```

pub mod chat;
pub mod mcp;
pub mod settings;

// Re-export commonly used types
pub use chat::OpenAiChatClient;
pub use mcp::McpToolEndpoint;
pub use settings::TestSettingsSource;
