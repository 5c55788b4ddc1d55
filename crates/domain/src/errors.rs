//! Error types for the evaluation toolkit.
//!
//! This module defines the error hierarchy for extraction and evaluation
//! operations, providing structured error information with error codes and a
//! retryability classification that feeds the transport retry predicate.

use std::path::PathBuf;

/// Top-level error type for evaluation operations.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Extraction-stage errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Errors talking to the chat or tool endpoint
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EvalError {
    /// Get the error code for this error
    ///
    /// Error codes are used in structured logs for programmatic filtering.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "EXTRACTION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error is retryable
    ///
    /// Only transient transport failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_retryable())
    }
}

/// Errors raised while extracting test cases from a source document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Source document missing
    #[error("Source document not found: {}", .path.display())]
    SourceNotFound {
        /// Path that was probed.
        path: PathBuf,
    },

    /// Service filter names areas outside the canonical set
    #[error(
        "No support added for service name(s): {}. Available services: {}",
        .invalid.join(", "),
        .available.join(", ")
    )]
    UnknownServiceAreas {
        /// Filter names that failed validation.
        invalid: Vec<String>,
        /// The canonical set, sorted.
        available: Vec<String>,
    },

    /// Mappings override file could not be read or parsed
    #[error("Invalid mappings file {}: {message}", .path.display())]
    InvalidMappings {
        /// Offending file.
        path: PathBuf,
        /// Parser or IO detail.
        message: String,
    },
}

/// Errors raised while talking to the chat or tool endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Chat completion request failed
    #[error(
        "Chat completion request failed{}: {message}",
        .status.map(|s| format!(" with status {s}")).unwrap_or_default()
    )]
    Chat {
        /// HTTP status when the server answered.
        status: Option<u16>,
        /// Response body or client error detail.
        message: String,
    },

    /// Chat completion response could not be decoded
    #[error("Chat completion response malformed: {0}")]
    ChatDecode(String),

    /// Tool invocation failed
    #[error("Tool call '{name}' failed: {message}")]
    Tool {
        /// Tool that was invoked.
        name: String,
        /// Server-reported detail.
        message: String,
    },

    /// Connection to an endpoint could not be established
    #[error("Connection to {endpoint} failed: {message}")]
    Connection {
        /// Endpoint description (URL or command line).
        endpoint: String,
        /// Underlying detail.
        message: String,
    },
}

impl TransportError {
    /// Check if this failure is transient
    ///
    /// Connect failures, 429 and 5xx responses are retryable; malformed
    /// payloads and tool-side failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection { .. } => true,
            Self::Chat {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Toolkit-wide result type
pub type EvalResult<T> = Result<T, EvalError>;
