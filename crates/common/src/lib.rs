//! Common utilities and shared functionality for the MCP eval toolkit.
//!
//! This crate provides foundational utilities used across the toolkit:
//! - Configuration management
//! - Telemetry and structured logging
//! - JSONL serialization helpers
//! - Retry logic with backoff

pub mod config;
pub mod jsonl;
pub mod retry;
pub mod telemetry;

// Re-export commonly used types
pub use config::{
    ChatConfig, DriverConfig, EvalConfig, ExtractionConfig, McpTransport, ScoringConfig,
    TelemetryConfig,
};
pub use jsonl::{read_jsonl, write_jsonl};
pub use retry::{retry_with_predicate, ExponentialBackoff, RetryConfig};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
