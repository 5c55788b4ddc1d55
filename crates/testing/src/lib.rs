//! Testing utilities for mcp-eval
//!
//! This crate provides the shared test toolkit:
//! - Fixtures for domain types and sample prompt documents
//! - Builder patterns for test-case and tool-definition construction
//! - In-memory endpoint doubles for driver and evaluation tests
//!
//! # Examples
//!
//! ```
//! use mcp_eval_testing::{builders::*, fixtures::*};
//!
//! // Create a canned test case
//! let case = create_test_case();
//!
//! // Build a tool definition with required parameters
//! let tool = ToolDefinitionBuilder::new("storage")
//!     .with_required_param("command")
//!     .build();
//! ```

pub mod builders;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
pub use wiremock;
