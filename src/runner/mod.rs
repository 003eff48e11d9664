//! Task execution engine
//!
//! This module holds the task registry, dependency resolution, the sequencer
//! and the task bodies it runs.

pub mod body;
pub mod command;
pub mod context;
pub mod entry;
pub mod files;
pub mod group;
pub mod interpolate;
pub mod plan;
pub mod registry;
pub mod sequencer;
pub mod task;

// Re-export main types
pub use body::*;
pub use command::*;
pub use context::*;
pub use entry::*;
pub use files::*;
pub use group::*;
pub use interpolate::*;
pub use plan::*;
pub use registry::*;
pub use sequencer::*;
pub use task::*;
