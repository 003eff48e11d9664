//! Core configuration types
//!
//! This module defines the data structures that represent a runseq.yml configuration file.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::GraphError;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Application name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Default variable values, overridable from the command line
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,

    /// Dotenv file with additional variables, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<String>,

    /// Tasks defined in the configuration; a repeated name is rejected
    #[serde(default, deserialize_with = "deserialize_tasks")]
    pub tasks: HashMap<String, Task>,

    /// Global interpreter to use for commands (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Task {
    /// Usage description for listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Whether this task is private (hidden from listings)
    #[serde(default)]
    pub private: bool,

    /// Prerequisite tasks, in the order they should be expanded
    #[serde(default, alias = "prerequisites", skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,

    /// Steps to execute, in order
    #[serde(default, deserialize_with = "deserialize_steps")]
    pub run: Vec<Step>,
}

/// A single step of a task body
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Step {
    /// Simple shell command
    Command(String),

    /// Step with an explicit action
    Detailed(StepDetail),
}

/// A step mapping; exactly one action field must be set
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StepDetail {
    /// Shell command to execute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec: Option<String>,

    /// What to print when running (defaults to exec)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to suppress the command echo
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Glob patterns to delete
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_patterns"
    )]
    pub remove: Vec<String>,

    /// Files to copy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy: Option<CopySpec>,

    /// In-place text replacement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<ReplaceSpec>,

    /// Steps to run concurrently
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_steps"
    )]
    pub parallel: Vec<Step>,
}

impl StepDetail {
    /// Names of the action fields that are set on this step
    pub fn actions(&self) -> Vec<&'static str> {
        let mut actions = Vec::new();
        if self.exec.is_some() {
            actions.push("exec");
        }
        if !self.remove.is_empty() {
            actions.push("remove");
        }
        if self.copy.is_some() {
            actions.push("copy");
        }
        if self.replace.is_some() {
            actions.push("replace");
        }
        if !self.parallel.is_empty() {
            actions.push("parallel");
        }
        actions
    }
}

/// Copy files matching `from` into the `to` directory
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CopySpec {
    /// Glob patterns of files or directories to copy
    #[serde(deserialize_with = "deserialize_patterns")]
    pub from: Vec<String>,

    /// Destination directory
    pub to: String,

    /// Directory matches are kept relative to (defaults to each pattern's literal prefix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// New file name for a single copied file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
}

/// Replace literal text in files matching `files`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplaceSpec {
    /// Glob patterns of files to rewrite
    #[serde(deserialize_with = "deserialize_patterns")]
    pub files: Vec<String>,

    /// Text to search for
    pub from: String,

    /// Replacement text
    pub to: String,
}

/// Custom deserializer for steps that handles both single values and arrays
fn deserialize_steps<'de, D>(deserializer: D) -> Result<Vec<Step>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Single string command
        Value::String(s) => Ok(vec![Step::Command(s)]),
        // Single step mapping
        Value::Mapping(_) => {
            let step = Step::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![step])
        }
        // Array of steps
        Value::Sequence(seq) => {
            let mut steps = Vec::new();
            for item in seq {
                let step = Step::deserialize(item).map_err(D::Error::custom)?;
                steps.push(step);
            }
            Ok(steps)
        }
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string, object, or array")),
    }
}

/// Read the task table entry by entry so a repeated name is an error
/// instead of silently replacing the earlier definition
fn deserialize_tasks<'de, D>(deserializer: D) -> Result<HashMap<String, Task>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct TasksVisitor;

    impl<'de> Visitor<'de> for TasksVisitor {
        type Value = HashMap<String, Task>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of task names to task definitions")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(HashMap::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            use serde::de::Error;

            let mut tasks = HashMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(name) = map.next_key::<String>()? {
                if tasks.contains_key(&name) {
                    return Err(A::Error::custom(GraphError::DuplicateTask(name)));
                }
                let task: Task = map.next_value()?;
                tasks.insert(name, task);
            }
            Ok(tasks)
        }
    }

    deserializer.deserialize_map(TasksVisitor)
}

/// Custom deserializer for glob pattern lists that also accepts a single string
fn deserialize_patterns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(D::Error::custom("pattern must be a string")),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("patterns must be a string or array")),
    }
}
