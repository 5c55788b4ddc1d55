//! Chat completion client for OpenAI-compatible endpoints.
//!
//! Speaks the `/chat/completions` wire format, including Azure OpenAI
//! deployments (`api-version` query parameter, `api-key` header). Tool call
//! arguments travel as JSON-encoded strings on the wire and are decoded into
//! argument objects before they reach the domain layer.

use async_trait::async_trait;
use mcp_eval_application::ChatEndpoint;
use mcp_eval_common::{retry_with_predicate, ChatConfig, RetryConfig};
use mcp_eval_domain::{
    ChatMessage, EvalError, MessageRole, ToolCallRecord, ToolDefinition, ToolParameters,
    TransportError,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Chat endpoint backed by an OpenAI-compatible HTTP API.
pub struct OpenAiChatClient {
    http: reqwest::Client,
    config: ChatConfig,
    url: String,
}

impl OpenAiChatClient {
    /// Build a client from endpoint configuration.
    ///
    /// The API key is attached to every request, either as a bearer token or
    /// under the configured header name (`api-key` for Azure deployments).
    pub fn new(config: ChatConfig) -> Result<Self, EvalError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = &config.api_key {
            match config.auth_header.as_deref() {
                Some(header) => {
                    let name = HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
                        EvalError::Configuration(format!("Invalid auth header name '{header}'"))
                    })?;
                    headers.insert(name, HeaderValue::from_str(key).map_err(invalid_key)?);
                }
                None => {
                    let bearer =
                        HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid_key)?;
                    headers.insert(AUTHORIZATION, bearer);
                }
            }
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| EvalError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );

        Ok(Self { http, config, url })
    }

    async fn send_once(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<ChatMessage, TransportError> {
        let mut call = self.http.post(&self.url).json(request);
        if let Some(version) = self.config.api_version_param() {
            call = call.query(&[("api-version", version)]);
        }

        let response = call.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Chat {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| TransportError::ChatDecode(e.to_string()))?;

        decode_completion(completion)
    }

    fn transport_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_connect() || error.is_timeout() {
            TransportError::Connection {
                endpoint: self.url.clone(),
                message: error.to_string(),
            }
        } else {
            TransportError::Chat {
                status: error.status().map(|s| s.as_u16()),
                message: error.to_string(),
            }
        }
    }
}

fn invalid_key(_: reqwest::header::InvalidHeaderValue) -> EvalError {
    EvalError::Configuration("API key contains characters not valid in a header".to_string())
}

#[async_trait]
impl ChatEndpoint for OpenAiChatClient {
    #[instrument(skip_all, fields(model = %self.config.model, messages = messages.len()))]
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage, TransportError> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages: messages.iter().map(wire_message).collect(),
            tools: tools.iter().map(wire_tool).collect(),
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
        };

        let reply = retry_with_predicate(
            RetryConfig::exponential(self.config.max_retries),
            || self.send_once(&request),
            TransportError::is_retryable,
        )
        .await?;

        debug!(tool_calls = reply.tool_calls.len(), "Chat completion received");
        Ok(reply)
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: WireFunction,
}

/// Function payload of a tool call; `arguments` is a JSON-encoded object.
#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireToolFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireToolFunction<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    parameters: &'a ToolParameters,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    }
}

fn wire_message(message: &ChatMessage) -> WireMessage {
    WireMessage {
        role: role_label(message.role),
        content: message.content.clone(),
        tool_calls: message.tool_calls.iter().map(wire_tool_call).collect(),
        tool_call_id: message.tool_call_id.clone(),
        name: message.name.clone(),
    }
}

fn wire_tool_call(call: &ToolCallRecord) -> WireToolCall {
    WireToolCall {
        id: call.id.clone(),
        kind: "function".to_string(),
        function: WireFunction {
            name: call.name.clone(),
            arguments: serde_json::to_string(&call.arguments)
                .unwrap_or_else(|_| "{}".to_string()),
        },
    }
}

fn wire_tool(tool: &ToolDefinition) -> WireTool<'_> {
    WireTool {
        kind: "function",
        function: WireToolFunction {
            name: &tool.name,
            description: tool.description.as_deref(),
            parameters: &tool.parameters,
        },
    }
}

fn decode_completion(completion: CompletionResponse) -> Result<ChatMessage, TransportError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TransportError::ChatDecode("response carried no choices".to_string()))?;

    let mut tool_calls = Vec::with_capacity(choice.message.tool_calls.len());
    for call in choice.message.tool_calls {
        let arguments = decode_arguments(&call.function.name, &call.function.arguments)?;
        tool_calls.push(ToolCallRecord::new(call.id, call.function.name, arguments));
    }

    Ok(ChatMessage::assistant_with_tool_calls(
        choice.message.content,
        tool_calls,
    ))
}

fn decode_arguments(name: &str, raw: &str) -> Result<Map<String, Value>, TransportError> {
    // Some servers send an empty string instead of an empty object.
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(raw).map_err(|e| {
        TransportError::ChatDecode(format!(
            "tool call '{name}' arguments are not a JSON object: {e}"
        ))
    })
}
