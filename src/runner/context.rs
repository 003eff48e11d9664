//! Execution context handed to task bodies
//!
//! The context is built once per invocation and never mutated while tasks run;
//! every body reads the same working directory, interpreter and variables.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Read-only configuration threaded into every task body
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory relative paths are resolved against
    pub working_dir: PathBuf,

    /// Variables (config defaults, dotenv, command-line overrides)
    pub vars: HashMap<String, String>,

    /// Interpreter for shell steps (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            vars: HashMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set variables
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Set a single variable while building the context
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Get a variable value
    pub fn get_var(&self, key: &str) -> Option<&String> {
        self.vars.get(key)
    }

    /// Resolve a possibly relative path against the working directory
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        self.working_dir.join(path)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
