//! CLI commands

pub mod extract;
pub mod run;
pub mod tools;
