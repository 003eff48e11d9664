//! Error types for runseq

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for runseq operations
pub type Result<T> = std::result::Result<T, RunseqError>;

/// Main error type for runseq
#[derive(Error, Debug)]
pub enum RunseqError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task graph errors (registration and resolution)
    #[error("Task graph error: {0}")]
    Graph(#[from] GraphError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Step {index} of task '{task}' has no action")]
    EmptyStep { task: String, index: usize },

    #[error("Step {index} of task '{task}' defines more than one action: {actions}")]
    AmbiguousStep {
        task: String,
        index: usize,
        actions: String,
    },

    #[error("Invalid override '{0}' (expected KEY=VALUE)")]
    InvalidOverride(String),

    #[error("Failed to load dotenv file '{path}': {error}")]
    Dotenv { path: PathBuf, error: String },
}

/// Task registration and dependency resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Invalid task name '{0}'")]
    InvalidName(String),

    #[error("Task '{0}' is already defined")]
    DuplicateTask(String),

    #[error("Task '{0}' is not defined")]
    UnknownTask(String),

    #[error("Circular dependency detected: {}", cycle_path(.0))]
    CyclicDependency(Vec<String>),
}

/// Failure reported by a task body
#[derive(Error, Debug)]
pub enum BodyError {
    #[error("Command '{command}' {}", exit_status(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid glob pattern '{pattern}': {error}")]
    Pattern { pattern: String, error: String },

    #[error("Interpolation failed: {0}")]
    Interpolation(#[from] InterpolationError),

    #[error("{}", parallel_summary(.total, .errors))]
    Parallel { total: usize, errors: Vec<BodyError> },

    #[error("{0}")]
    Failed(String),
}

impl BodyError {
    /// Shorthand for an I/O failure on a path
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BodyError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Invalid interpolation syntax: {0}")]
    InvalidSyntax(String),

    #[error("Recursive interpolation detected")]
    RecursiveInterpolation,
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for registry and plan operations
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Specialized result type for task bodies
pub type BodyResult<T> = std::result::Result<T, BodyError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

fn cycle_path(path: &[String]) -> String {
    path.join(" -> ")
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("failed with exit code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

fn parallel_summary(total: &usize, errors: &[BodyError]) -> String {
    match errors.first() {
        Some(first) => format!(
            "{} of {} parallel steps failed; first: {}",
            errors.len(),
            total,
            first
        ),
        None => format!("0 of {} parallel steps failed", total),
    }
}
