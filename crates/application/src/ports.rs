//! Endpoint contracts implemented by the infrastructure layer.

use async_trait::async_trait;
use mcp_eval_domain::{ChatMessage, ToolDefinition, TransportError};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Chat completion endpoint.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Send the conversation plus tool catalog, returning the next
    /// assistant message.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage, TransportError>;
}

/// Tool-providing endpoint, typically an MCP server.
#[async_trait]
pub trait ToolEndpoint: Send + Sync {
    /// List the tool definitions the endpoint exposes.
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, TransportError>;

    /// Invoke a tool and return its primary text payload.
    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<String, TransportError>;
}

/// Key-value lookup consulted during placeholder resolution.
///
/// Implementations cover only their own backing store; the resolver falls
/// back to the process environment for absent keys.
pub trait SettingsSource: Send + Sync {
    /// Look up a settings key.
    fn get(&self, key: &str) -> Option<String>;
}

/// Settings drawn from the process environment alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl SettingsSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}
