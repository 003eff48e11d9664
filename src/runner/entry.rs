//! Top-level invocation
//!
//! Turns a request into a run and the run into a process-level outcome.

use tracing::error;

use crate::error::GraphError;
use crate::runner::{Context, Registry, RunResult, Sequencer};

/// Name of the task run when nothing is requested
pub const DEFAULT_TASK: &str = "default";

/// What the caller asked to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunRequest {
    /// A single task and its prerequisites
    Task(String),

    /// Several tasks, left to right
    Sequence(Vec<String>),
}

impl RunRequest {
    /// Build a request from positional names; `None` when there are none
    pub fn from_names(mut names: Vec<String>) -> Option<Self> {
        match names.len() {
            0 => None,
            1 => names.pop().map(RunRequest::Task),
            _ => Some(RunRequest::Sequence(names)),
        }
    }

    /// Request the `default` task if the registry defines one
    pub fn default_for(registry: &Registry) -> Option<Self> {
        registry
            .contains(DEFAULT_TASK)
            .then(|| RunRequest::Task(DEFAULT_TASK.to_string()))
    }

    /// The run list for the sequencer
    pub fn run_list(&self) -> Vec<String> {
        match self {
            RunRequest::Task(name) => vec![name.clone()],
            RunRequest::Sequence(names) => names.clone(),
        }
    }
}

/// Process-level result of an invocation
#[derive(Debug)]
pub struct Outcome {
    /// Exit status: 0 success, 1 task failure, 2 unresolvable request
    pub code: i32,

    /// Failure description for stderr
    pub message: Option<String>,

    /// Per-run details when the request resolved
    pub result: Option<RunResult>,
}

impl Outcome {
    /// Outcome for a request that could not be resolved into a plan
    pub fn unresolved(err: &GraphError) -> Self {
        error!(error = %err, "could not resolve run list");
        Outcome {
            code: EXIT_UNRESOLVED,
            message: Some(err.to_string()),
            result: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Exit status when the request could not be resolved
pub const EXIT_UNRESOLVED: i32 = 2;

/// Run a request and map the result to an exit status
pub async fn invoke(registry: &Registry, request: &RunRequest, ctx: &Context) -> Outcome {
    let run_list = request.run_list();

    match Sequencer::new(registry).run(&run_list, ctx).await {
        Ok(result) => {
            let message = result.failure.as_ref().map(|failure| failure.to_string());
            Outcome {
                code: result.exit_code(),
                message,
                result: Some(result),
            }
        }
        Err(e) => Outcome::unresolved(&e),
    }
}
