//! Tool calls issued by the model and tool definitions advertised by the server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Argument key that carries the command selector on generated tool calls.
pub const COMMAND_ARGUMENT: &str = "command";

/// A single tool invocation requested by the model.
///
/// `arguments` holds the parsed object form; wire formats that transmit
/// arguments as a JSON-encoded string are decoded before this record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Provider-assigned call identifier, echoed back in tool-role replies.
    pub id: String,
    /// Name of the tool being invoked.
    pub name: String,
    /// Parsed invocation arguments.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCallRecord {
    /// Create a record from a parsed argument object.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// The `command` argument as a string, when present.
    pub fn command_argument(&self) -> Option<&str> {
        self.arguments.get(COMMAND_ARGUMENT).and_then(Value::as_str)
    }
}

/// A callable tool advertised by the tool endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name as advertised.
    pub name: String,
    /// Human-readable description, when the server provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Input schema for the tool.
    #[serde(default)]
    pub parameters: ToolParameters,
}

impl ToolDefinition {
    /// Create a definition with an empty parameter schema.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            parameters: ToolParameters::default(),
        }
    }
}

/// JSON-schema input description for a tool.
///
/// Only the pieces the scorer and the chat catalog need are modeled; the full
/// property schemas are carried through as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    /// Schema `type`; `"object"` for every known server.
    #[serde(rename = "type", default = "default_schema_type")]
    pub schema_type: String,
    /// Property definitions keyed by parameter name.
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Names of parameters the tool requires.
    #[serde(default)]
    pub required: Vec<String>,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            schema_type: default_schema_type(),
            properties: Map::new(),
            required: Vec::new(),
        }
    }
}

fn default_schema_type() -> String {
    "object".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_argument() {
        let mut arguments = Map::new();
        arguments.insert("command".to_string(), json!("storage_blob_list"));
        let call = ToolCallRecord::new("call_1", "storage", arguments);
        assert_eq!(call.command_argument(), Some("storage_blob_list"));
    }

    #[test]
    fn test_command_argument_absent_or_non_string() {
        let call = ToolCallRecord::new("call_1", "storage", Map::new());
        assert_eq!(call.command_argument(), None);

        let mut arguments = Map::new();
        arguments.insert("command".to_string(), json!(42));
        let call = ToolCallRecord::new("call_2", "storage", arguments);
        assert_eq!(call.command_argument(), None);
    }

    #[test]
    fn test_parameters_from_partial_schema() {
        let schema = json!({
            "type": "object",
            "properties": {
                "account": { "type": "string" }
            }
        });
        let parameters: ToolParameters = serde_json::from_value(schema).unwrap();
        assert_eq!(parameters.schema_type, "object");
        assert!(parameters.required.is_empty());
        assert!(parameters.properties.contains_key("account"));
    }

    #[test]
    fn test_parameters_default_type() {
        let parameters: ToolParameters = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parameters.schema_type, "object");
    }
}
