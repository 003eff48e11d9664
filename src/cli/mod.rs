//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, logging setup and the
//! presentation of run results.

pub mod app;

// Re-export main types
pub use app::*;
