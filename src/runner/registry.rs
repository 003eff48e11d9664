//! Task registry
//!
//! An explicit table of tasks keyed by name. Runs borrow a registry instead of
//! reaching for process-wide state, so tests can build as many as they like.

use std::collections::HashMap;
use tracing::debug;

use crate::config::Config;
use crate::error::{GraphError, GraphResult};
use crate::runner::{ExecutionPlan, Task, TaskBody};

/// All tasks known to a run, keyed by name
#[derive(Debug, Default)]
pub struct Registry {
    tasks: HashMap<String, Task>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed configuration
    pub fn from_config(config: &Config) -> GraphResult<Self> {
        let mut registry = Registry::new();
        for (name, task) in &config.tasks {
            registry.register(Task::from_config(name.clone(), task.clone()))?;
        }
        Ok(registry)
    }

    /// Add a task; the name must be non-empty and not yet registered
    pub fn register(&mut self, task: Task) -> GraphResult<()> {
        if task.name.trim().is_empty() {
            return Err(GraphError::InvalidName(task.name));
        }
        if self.tasks.contains_key(&task.name) {
            return Err(GraphError::DuplicateTask(task.name));
        }

        debug!(task = %task.name, prerequisites = ?task.prerequisites, "registered task");
        self.tasks.insert(task.name.clone(), task);
        Ok(())
    }

    /// Define a task from its parts
    pub fn define(
        &mut self,
        name: impl Into<String>,
        prerequisites: &[&str],
        body: Box<dyn TaskBody>,
    ) -> GraphResult<()> {
        let prerequisites = prerequisites.iter().map(|p| p.to_string()).collect();
        self.register(Task::new(name, prerequisites, body))
    }

    /// Look up a task by name
    pub fn lookup(&self, name: &str) -> GraphResult<&Task> {
        self.tasks
            .get(name)
            .ok_or_else(|| GraphError::UnknownTask(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Registered task names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered tasks, sorted by name
    pub fn tasks(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.values().collect();
        tasks.sort_by(|a, b| a.name.cmp(&b.name));
        tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Resolve every task once so unknown prerequisites and cycles anywhere
    /// in the table surface before a run starts
    pub fn check_graph(&self) -> GraphResult<()> {
        let names: Vec<String> = self.names().into_iter().map(str::to_string).collect();
        ExecutionPlan::resolve(self, &names).map(|_| ())
    }
}
