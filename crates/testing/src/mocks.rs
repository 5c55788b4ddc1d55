//! Mock endpoint implementations for driving conversations without a live
//! model or MCP server.

use async_trait::async_trait;
use mcp_eval_application::{ChatEndpoint, ToolEndpoint};
use mcp_eval_domain::{ChatMessage, ToolDefinition, TransportError};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Chat endpoint that replays a scripted sequence of responses.
///
/// Responses are consumed in order. Once the script runs dry the endpoint
/// returns its fallback message, so drivers that keep asking see a stable
/// answer instead of an error.
pub struct ScriptedChatEndpoint {
    script: Mutex<VecDeque<Result<ChatMessage, TransportError>>>,
    fallback: ChatMessage,
    completions: AtomicUsize,
}

impl ScriptedChatEndpoint {
    /// Endpoint with an empty script; every completion yields the fallback.
    pub fn new() -> Self {
        Self::from_script(Vec::new())
    }

    /// Endpoint that replays `script` then falls back to a plain message.
    pub fn from_script(script: Vec<Result<ChatMessage, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: ChatMessage::assistant("No further actions."),
            completions: AtomicUsize::new(0),
        }
    }

    /// Endpoint that answers every completion with the same message.
    ///
    /// Useful for exhaustion scenarios where the model keeps issuing tool
    /// calls until the attempt budget runs out.
    pub fn repeating(message: ChatMessage) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: message,
            completions: AtomicUsize::new(0),
        }
    }

    /// Number of completion requests served so far.
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedChatEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatEndpoint for ScriptedChatEndpoint {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<ChatMessage, TransportError> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().pop_front() {
            Some(response) => response,
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Tool endpoint that records every call and serves canned responses.
pub struct RecordingToolEndpoint {
    catalog: Vec<ToolDefinition>,
    responses: HashMap<String, String>,
    default_response: String,
    calls: Mutex<Vec<(String, Map<String, Value>)>>,
    fail_on: Option<String>,
    fail_listing: bool,
}

impl RecordingToolEndpoint {
    pub fn new(catalog: Vec<ToolDefinition>) -> Self {
        Self {
            catalog,
            responses: HashMap::new(),
            default_response: "{\"status\": \"ok\"}".to_string(),
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            fail_listing: false,
        }
    }

    /// Serve `response` for calls to the named tool.
    pub fn with_response(mut self, name: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.insert(name.into(), response.into());
        self
    }

    /// Fail calls to the named tool with a tool-side error.
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.fail_on = Some(name.into());
        self
    }

    /// Fail `list_tools` with a connection error.
    pub fn with_list_failure(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// All recorded calls in invocation order.
    pub fn calls(&self) -> Vec<(String, Map<String, Value>)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ToolEndpoint for RecordingToolEndpoint {
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, TransportError> {
        if self.fail_listing {
            return Err(TransportError::Connection {
                endpoint: "mock tool endpoint".to_string(),
                message: "listing disabled".to_string(),
            });
        }
        Ok(self.catalog.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<String, TransportError> {
        self.calls
            .lock()
            .push((name.to_string(), arguments.clone()));

        if self.fail_on.as_deref() == Some(name) {
            return Err(TransportError::Tool {
                name: name.to_string(),
                message: "simulated tool failure".to_string(),
            });
        }

        Ok(self
            .responses
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}
