//! Scoring module
//!
//! Weighted tool-call accuracy verdicts and run-report emission.

mod accuracy;
mod report;

pub use accuracy::*;
pub use report::*;
