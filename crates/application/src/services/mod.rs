//! Application Services
//!
//! The evaluation pipeline: markdown extraction, placeholder resolution,
//! conversation driving, and run orchestration.

mod driver;
mod evaluation;
mod extraction;
mod resolution;

pub use driver::*;
pub use evaluation::*;
pub use extraction::*;
pub use resolution::*;
