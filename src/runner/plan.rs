//! Dependency resolution
//!
//! Expands a requested run list into the ordered, deduplicated list of tasks
//! to execute. Prerequisites are visited depth-first in declared order and
//! the run list left to right, so the plan does not depend on registration
//! order.

use std::collections::HashSet;
use std::fmt;

use crate::error::{GraphError, GraphResult};
use crate::runner::Registry;

/// Fully resolved order of tasks for one request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionPlan {
    order: Vec<String>,
}

impl ExecutionPlan {
    /// Resolve a run list against a registry
    pub fn resolve<S: AsRef<str>>(registry: &Registry, run_list: &[S]) -> GraphResult<Self> {
        let mut resolver = Resolver {
            registry,
            visiting: Vec::new(),
            visited: HashSet::new(),
            order: Vec::new(),
        };

        for name in run_list {
            resolver.visit(name.as_ref())?;
        }

        Ok(ExecutionPlan {
            order: resolver.order,
        })
    }

    /// Task names in execution order
    pub fn tasks(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.order.join(" -> "))
    }
}

struct Resolver<'a> {
    registry: &'a Registry,
    /// Path from the current root to the task being expanded
    visiting: Vec<String>,
    visited: HashSet<String>,
    order: Vec<String>,
}

impl Resolver<'_> {
    fn visit(&mut self, name: &str) -> GraphResult<()> {
        if self.visited.contains(name) {
            return Ok(());
        }

        if let Some(start) = self.visiting.iter().position(|n| n == name) {
            let mut cycle = self.visiting[start..].to_vec();
            cycle.push(name.to_string());
            return Err(GraphError::CyclicDependency(cycle));
        }

        let task = self.registry.lookup(name)?;

        self.visiting.push(name.to_string());
        for prerequisite in &task.prerequisites {
            self.visit(prerequisite)?;
        }
        self.visiting.pop();

        self.visited.insert(name.to_string());
        self.order.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Noop;

    fn registry(edges: &[(&str, &[&str])]) -> Registry {
        let mut registry = Registry::new();
        for (name, prerequisites) in edges {
            registry.define(*name, prerequisites, Box::new(Noop)).unwrap();
        }
        registry
    }

    #[test]
    fn test_linear_chain() {
        let registry = registry(&[
            ("clean", &[]),
            ("compile", &["clean"]),
            ("bundle", &["compile"]),
        ]);

        let plan = ExecutionPlan::resolve(&registry, &["bundle"]).unwrap();
        assert_eq!(plan.tasks(), ["clean", "compile", "bundle"]);
        assert_eq!(plan.to_string(), "clean -> compile -> bundle");
    }

    #[test]
    fn test_shared_prerequisite_appears_once() {
        let registry = registry(&[("p", &[]), ("x", &["p"]), ("y", &["p"])]);

        let plan = ExecutionPlan::resolve(&registry, &["x", "y"]).unwrap();
        assert_eq!(plan.tasks(), ["p", "x", "y"]);
    }

    #[test]
    fn test_requested_prerequisite_is_not_repeated() {
        let registry = registry(&[("clean", &[]), ("compile", &["clean"])]);

        let plan = ExecutionPlan::resolve(&registry, &["compile", "clean"]).unwrap();
        assert_eq!(plan.tasks(), ["clean", "compile"]);
    }

    #[test]
    fn test_declared_order_breaks_ties() {
        let registry = registry(&[
            ("docs", &["styleguide", "typedoc"]),
            ("typedoc", &[]),
            ("styleguide", &["less"]),
            ("less", &[]),
        ]);

        let plan = ExecutionPlan::resolve(&registry, &["docs"]).unwrap();
        assert_eq!(plan.tasks(), ["less", "styleguide", "typedoc", "docs"]);
    }

    #[test]
    fn test_plan_independent_of_registration_order() {
        let forward = registry(&[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["a"]),
            ("d", &["c", "b"]),
        ]);
        let backward = registry(&[
            ("d", &["c", "b"]),
            ("c", &["a"]),
            ("b", &["a"]),
            ("a", &[]),
        ]);

        let first = ExecutionPlan::resolve(&forward, &["d"]).unwrap();
        let second = ExecutionPlan::resolve(&backward, &["d"]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.tasks(), ["a", "c", "b", "d"]);
    }

    #[test]
    fn test_every_task_precedes_its_dependents() {
        let registry = registry(&[
            ("default", &["libs", "aot", "jit", "docs"]),
            ("libs", &["lib", "bundle"]),
            ("lib", &["clean"]),
            ("bundle", &["lib"]),
            ("aot", &["clean", "lib"]),
            ("jit", &[]),
            ("docs", &["styleguide", "typedoc"]),
            ("styleguide", &[]),
            ("typedoc", &["clean"]),
            ("clean", &[]),
        ]);

        let plan = ExecutionPlan::resolve(&registry, &["default"]).unwrap();
        assert_eq!(plan.len(), registry.len());

        let unique: HashSet<&String> = plan.tasks().iter().collect();
        assert_eq!(unique.len(), plan.len());

        for task in registry.tasks() {
            let position = plan.position(&task.name).unwrap();
            for prerequisite in &task.prerequisites {
                assert!(plan.position(prerequisite).unwrap() < position);
            }
        }
    }

    #[test]
    fn test_two_task_cycle() {
        let registry = registry(&[("a", &["b"]), ("b", &["a"])]);

        let result = ExecutionPlan::resolve(&registry, &["a"]);
        assert_eq!(
            result,
            Err(GraphError::CyclicDependency(vec![
                "a".to_string(),
                "b".to_string(),
                "a".to_string()
            ]))
        );
    }

    #[test]
    fn test_cycle_path_excludes_entry_prefix() {
        let registry = registry(&[
            ("root", &["a"]),
            ("a", &["b"]),
            ("b", &["c"]),
            ("c", &["a"]),
        ]);

        let result = ExecutionPlan::resolve(&registry, &["root"]);
        assert_eq!(
            result,
            Err(GraphError::CyclicDependency(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "a".to_string()
            ]))
        );
    }

    #[test]
    fn test_self_dependency() {
        let registry = registry(&[("loop", &["loop"])]);
        assert!(matches!(
            ExecutionPlan::resolve(&registry, &["loop"]),
            Err(GraphError::CyclicDependency(_))
        ));
    }

    #[test]
    fn test_unknown_requested_task() {
        let registry = registry(&[("clean", &[])]);
        assert_eq!(
            ExecutionPlan::resolve(&registry, &["deploy"]),
            Err(GraphError::UnknownTask("deploy".to_string()))
        );
    }

    #[test]
    fn test_unknown_prerequisite() {
        let registry = registry(&[("bundle", &["compile"])]);
        assert_eq!(
            ExecutionPlan::resolve(&registry, &["bundle"]),
            Err(GraphError::UnknownTask("compile".to_string()))
        );
    }

    #[test]
    fn test_empty_run_list() {
        let registry = registry(&[("clean", &[])]);
        let plan = ExecutionPlan::resolve::<&str>(&registry, &[]).unwrap();
        assert!(plan.is_empty());
    }
}
