//! MCP tool endpoint over stdio or SSE transports.
//!
//! Each operation establishes a fresh server session, issues its request, and
//! cancels the session. Tool schemas arrive as raw JSON objects and are
//! narrowed to the parameter shape the scorer understands.

use async_trait::async_trait;
use mcp_eval_application::ToolEndpoint;
use mcp_eval_common::McpTransport;
use mcp_eval_domain::{ToolDefinition, ToolParameters, TransportError};
use rmcp::{
    model::{CallToolRequestParam, CallToolResult, RawContent, RawTextContent, Tool},
    service::RunningService,
    transport::{child_process::TokioChildProcess, ConfigureCommandExt},
    RoleClient, ServiceExt,
};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::process::Stdio;
use tracing::{debug, instrument, warn};

/// Tool endpoint backed by an MCP server.
pub struct McpToolEndpoint {
    transport: McpTransport,
}

impl McpToolEndpoint {
    /// Create an endpoint for the configured transport.
    pub fn new(transport: McpTransport) -> Self {
        Self { transport }
    }

    async fn connect(&self) -> Result<RunningService<RoleClient, ()>, TransportError> {
        match &self.transport {
            McpTransport::Sse { url } => {
                let transport = rmcp::transport::SseClientTransport::start(url.as_str())
                    .await
                    .map_err(|e| self.connection_error(e))?;
                ().serve(transport)
                    .await
                    .map_err(|e| self.connection_error(e))
            }
            McpTransport::Stdio {
                command,
                args,
                envs,
            } => {
                let transport = TokioChildProcess::new(
                    tokio::process::Command::new(command).configure(|cmd| {
                        cmd.args(args)
                            .envs(envs)
                            .stderr(Stdio::inherit())
                            .stdout(Stdio::inherit());
                    }),
                )
                .map_err(|e| self.connection_error(e))?;
                ().serve(transport)
                    .await
                    .map_err(|e| self.connection_error(e))
            }
        }
    }

    fn connection_error(&self, error: impl std::fmt::Display) -> TransportError {
        TransportError::Connection {
            endpoint: self.transport.endpoint(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl ToolEndpoint for McpToolEndpoint {
    #[instrument(skip(self), fields(endpoint = %self.transport.endpoint()))]
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, TransportError> {
        let service = self.connect().await?;
        let peer = service.peer().clone();
        let listed = peer
            .list_all_tools()
            .await
            .map_err(|e| self.connection_error(e));
        let _ = service.cancel().await;

        let tools: Vec<ToolDefinition> = listed?.into_iter().map(convert_tool).collect();
        debug!(count = tools.len(), "Listed MCP tools");
        Ok(tools)
    }

    #[instrument(skip(self, arguments), fields(tool = name))]
    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<String, TransportError> {
        let service = self.connect().await?;
        let outcome = service
            .call_tool(CallToolRequestParam {
                name: Cow::Owned(name.to_string()),
                arguments: Some(arguments.clone()),
            })
            .await
            .map_err(|e| TransportError::Tool {
                name: name.to_string(),
                message: e.to_string(),
            });
        let _ = service.cancel().await;

        let result = outcome?;
        if result.is_error.unwrap_or_default() {
            let mut message = text_payload(&result);
            if message.is_empty() {
                message = "tool reported an error".to_string();
            }
            return Err(TransportError::Tool {
                name: name.to_string(),
                message,
            });
        }

        Ok(text_payload(&result))
    }
}

fn convert_tool(tool: Tool) -> ToolDefinition {
    let schema = Value::Object(tool.input_schema.as_ref().clone());
    let parameters = serde_json::from_value::<ToolParameters>(schema).unwrap_or_else(|e| {
        warn!(tool = %tool.name, error = %e, "Unusable tool schema, treating as empty");
        ToolParameters::default()
    });

    ToolDefinition {
        name: tool.name.into_owned(),
        description: tool.description.map(|d| d.into_owned()),
        parameters,
    }
}

/// First text content item, falling back to the JSON form of the first item.
fn text_payload(result: &CallToolResult) -> String {
    for item in &result.content {
        if let RawContent::Text(RawTextContent { text, .. }) = &item.raw {
            return text.clone();
        }
    }
    result
        .content
        .first()
        .and_then(|item| serde_json::to_string(item).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_from(value: Value) -> Tool {
        serde_json::from_value(value).unwrap()
    }

    fn result_from(value: Value) -> CallToolResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_converts_tool_from_wire_schema() {
        let tool = tool_from(json!({
            "name": "storage",
            "description": "Storage operations.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "command": { "type": "string" }
                },
                "required": ["command"]
            }
        }));

        let definition = convert_tool(tool);
        assert_eq!(definition.name, "storage");
        assert_eq!(definition.description.as_deref(), Some("Storage operations."));
        assert_eq!(definition.parameters.required, vec!["command"]);
        assert!(definition.parameters.properties.contains_key("command"));
    }

    #[test]
    fn test_unusable_schema_becomes_empty_parameters() {
        let tool = tool_from(json!({
            "name": "storage",
            "inputSchema": { "type": 42 }
        }));

        let definition = convert_tool(tool);
        assert_eq!(definition.parameters, ToolParameters::default());
        assert_eq!(definition.description, None);
    }

    #[test]
    fn test_text_payload_prefers_text_items() {
        let result = result_from(json!({
            "content": [
                { "type": "image", "data": "aGk=", "mimeType": "image/png" },
                { "type": "text", "text": "{\"accounts\": []}" }
            ]
        }));
        assert_eq!(text_payload(&result), "{\"accounts\": []}");
    }

    #[test]
    fn test_text_payload_falls_back_to_json() {
        let result = result_from(json!({
            "content": [
                { "type": "image", "data": "aGk=", "mimeType": "image/png" }
            ]
        }));
        assert!(text_payload(&result).contains("image/png"));
    }

    #[test]
    fn test_text_payload_empty_content() {
        let result = result_from(json!({ "content": [] }));
        assert_eq!(text_payload(&result), "");
    }
}
