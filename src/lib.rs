//! runseq - a declarative task-graph build orchestrator
//!
//! Tasks are declared in a YAML file with their prerequisites and a body made
//! of shell commands, file operations and parallel groups. A run list is
//! resolved into a deduplicated plan and executed one task at a time,
//! stopping at the first failure.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, RunseqError};

/// Current version of runseq
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
