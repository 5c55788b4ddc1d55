//! MCP Eval Domain Types
//!
//! This crate provides the core domain model for the MCP tool-calling
//! evaluation toolkit: the test-case corpus schema, tool-call and
//! tool-definition records, chat transcript messages, placeholder tiers, and
//! the verdict and report types produced by an evaluation run.
//!
//! ## Architecture
//!
//! The domain layer is organized into the following modules:
//!
//! - **test_case**: extracted test cases and the expected-tool-call pair
//! - **tool**: tool calls issued by the model and tool definitions advertised
//!   by the server
//! - **conversation**: chat messages exchanged with the completion endpoint
//! - **placeholder**: placeholder value tiers applied to prompts before execution
//! - **verdict**: per-case accuracy verdicts
//! - **report**: whole-run reports and aggregate metrics
//! - **errors**: error hierarchy with retryability classification
//!
//! ## Usage
//!
//! ```rust
//! use mcp_eval_domain::test_case::ExpectedToolCalls;
//!
//! let expected = ExpectedToolCalls::parse("azmcp-storage-blob-list");
//! assert_eq!(expected.service, "storage");
//! assert_eq!(expected.command, "storage_blob_list");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core domain modules
pub mod conversation;
pub mod errors;
pub mod placeholder;
pub mod report;
pub mod test_case;
pub mod tool;
pub mod verdict;

// Re-export commonly used types
pub use conversation::{ChatMessage, MessageRole};
pub use errors::{EvalError, EvalResult, ExtractionError, TransportError};
pub use placeholder::{PlaceholderTiers, PlaceholderValues, UnmappedPolicy};
pub use report::{CaseEvaluation, EvaluationReport, ReportMetrics, RunId};
pub use test_case::{ExpectedToolCalls, TestCase};
pub use tool::{ToolCallRecord, ToolDefinition, ToolParameters};
pub use verdict::{EvaluationVerdict, ParamCheckMode, ToolCallAccuracy};
