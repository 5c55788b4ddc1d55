//! Conversation Driver
//!
//! Drives a tool-calling conversation for a single test case: sends the
//! history to the chat endpoint, executes any tool calls the model returns,
//! and repeats until the model stops calling tools or the attempt budget
//! runs out.

use crate::ports::{ChatEndpoint, ToolEndpoint};
use mcp_eval_common::DriverConfig;
use mcp_eval_domain::{ChatMessage, TestCase, ToolCallRecord, ToolDefinition, TransportError};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Transcript and tool calls collected for one test case.
#[derive(Debug, Clone)]
pub struct DriverOutcome {
    /// Every message exchanged, seed context included.
    pub transcript: Vec<ChatMessage>,
    /// Every tool call the model issued, in order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Chat round-trips consumed.
    pub attempts: u32,
    /// Whether the budget ran out before the model stopped calling tools.
    pub exhausted: bool,
}

/// Drives tool-calling conversations against the configured endpoints.
pub struct ConversationDriver<C, T>
where
    C: ChatEndpoint,
    T: ToolEndpoint,
{
    chat: Arc<C>,
    tools: Arc<T>,
    config: DriverConfig,
}

impl<C, T> ConversationDriver<C, T>
where
    C: ChatEndpoint,
    T: ToolEndpoint,
{
    /// Create a driver over the given endpoints.
    pub fn new(chat: Arc<C>, tools: Arc<T>, config: DriverConfig) -> Self {
        Self {
            chat,
            tools,
            config,
        }
    }

    /// Run the conversation for `case` with `catalog` as the tool offering.
    ///
    /// Tool calls within one response execute sequentially, each answered by
    /// a tool-role message carrying the tool's text payload. Exhausting the
    /// attempt budget is not an error; the partial outcome is returned with
    /// `exhausted` set.
    #[instrument(skip(self, case, catalog), fields(area = %case.service_area))]
    pub async fn drive(
        &self,
        case: &TestCase,
        catalog: &[ToolDefinition],
    ) -> Result<DriverOutcome, TransportError> {
        let mut transcript = Vec::new();
        if let Some(context) = self.config.seed_context() {
            transcript.push(ChatMessage::assistant(context));
        }
        transcript.push(ChatMessage::user(case.query.clone()));

        let mut tool_calls: Vec<ToolCallRecord> = Vec::new();
        let mut attempts = 0;
        let mut exhausted = true;

        while attempts < self.config.max_attempts {
            attempts += 1;

            let response = self.chat.complete(&transcript, catalog).await?;
            let calls = response.tool_calls.clone();
            transcript.push(response);

            if calls.is_empty() {
                exhausted = false;
                break;
            }

            debug!(attempt = attempts, calls = calls.len(), "Executing tool calls");
            tool_calls.extend(calls.iter().cloned());

            for call in &calls {
                let content = self.tools.call_tool(&call.name, &call.arguments).await?;
                transcript.push(ChatMessage::tool(
                    call.id.clone(),
                    call.name.clone(),
                    content,
                ));
            }
        }

        if exhausted {
            debug!(attempts, "Attempt budget exhausted");
        }

        Ok(DriverOutcome {
            transcript,
            tool_calls,
            attempts,
            exhausted,
        })
    }
}
