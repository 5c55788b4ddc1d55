//! Application layer for mcp-eval
//!
//! This crate orchestrates the evaluation pipeline on top of the domain
//! model: extracting test cases from markdown, resolving placeholders,
//! driving tool-calling conversations, and scoring the outcomes.
//!
//! ## Architecture
//!
//! Network and filesystem endpoints are abstracted behind ports implemented
//! by the infrastructure layer, so every service here is testable with
//! in-memory doubles.
//!
//! ## Modules
//!
//! - `ports` - Endpoint contracts (chat completions, tool execution, settings)
//! - `services` - Extraction, resolution, driver, and evaluation services
//! - `scoring` - Tool-call accuracy scoring and report emission

pub mod ports;
pub mod scoring;
pub mod services;

// Re-export commonly used types
pub use ports::{ChatEndpoint, EnvSettings, SettingsSource, ToolEndpoint};
pub use scoring::{write_report, AccuracyScorer};
pub use services::{
    ConversationDriver, DriverOutcome, EvaluationService, MarkdownExtractor, PlaceholderResolver,
    ResolutionOutcome, ServiceMappings, VariableMappings,
};
