//! Runtime task representation
//!
//! This module turns configuration entries into tasks owning their bodies.

use std::fmt;

use crate::config;
use crate::runner::{
    CopyPaths, Noop, ParallelGroup, RemovePaths, ReplaceText, ShellCommand, Steps, TaskBody,
};

/// A named, schedulable unit of work
pub struct Task {
    /// Task name
    pub name: String,

    /// Tasks that must complete before this one starts, in declared order
    pub prerequisites: Vec<String>,

    /// Usage description
    pub usage: Option<String>,

    /// Whether this task is hidden from listings
    pub private: bool,

    /// Work performed when the task runs
    pub body: Box<dyn TaskBody>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        prerequisites: Vec<String>,
        body: Box<dyn TaskBody>,
    ) -> Self {
        Task {
            name: name.into(),
            prerequisites,
            usage: None,
            private: false,
            body,
        }
    }

    /// Create a task from its configuration entry
    pub fn from_config(name: String, config: config::Task) -> Self {
        Task {
            name,
            prerequisites: config.deps,
            usage: config.usage,
            private: config.private,
            body: body_from_steps(config.run),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("prerequisites", &self.prerequisites)
            .field("usage", &self.usage)
            .field("private", &self.private)
            .field("body", &self.body.describe())
            .finish()
    }
}

/// Build the body for a list of configured steps
pub fn body_from_steps(steps: Vec<config::Step>) -> Box<dyn TaskBody> {
    let mut bodies: Vec<Box<dyn TaskBody>> = steps.into_iter().map(body_from_step).collect();

    match bodies.len() {
        0 => Box::new(Noop),
        1 => bodies.remove(0),
        _ => Box::new(Steps::new(bodies)),
    }
}

/// Build the body for a single configured step
///
/// Steps are expected to have passed `validate_config`; a step with several
/// actions uses the first one in field order.
pub fn body_from_step(step: config::Step) -> Box<dyn TaskBody> {
    let detail = match step {
        config::Step::Command(exec) => return Box::new(ShellCommand::new(exec)),
        config::Step::Detailed(detail) => detail,
    };

    if let Some(exec) = detail.exec {
        Box::new(ShellCommand {
            exec,
            print: detail.print,
            quiet: detail.quiet,
            dir: detail.dir,
        })
    } else if !detail.remove.is_empty() {
        Box::new(RemovePaths {
            patterns: detail.remove,
        })
    } else if let Some(copy) = detail.copy {
        Box::new(CopyPaths {
            from: copy.from,
            to: copy.to,
            base: copy.base,
            rename: copy.rename,
        })
    } else if let Some(replace) = detail.replace {
        Box::new(ReplaceText {
            files: replace.files,
            from: replace.from,
            to: replace.to,
        })
    } else if !detail.parallel.is_empty() {
        Box::new(ParallelGroup::new(
            detail.parallel.into_iter().map(body_from_step).collect(),
        ))
    } else {
        Box::new(Noop)
    }
}
