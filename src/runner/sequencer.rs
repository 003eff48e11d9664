//! Sequential plan execution
//!
//! The sequencer runs a resolved plan one task at a time. A task starts only
//! after the previous one finished; the first failure ends the run and the
//! rest of the plan is never started.

use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, info_span, Instrument};

use crate::error::{BodyError, GraphResult};
use crate::runner::{Context, ExecutionPlan, Registry};

/// The task that stopped a run and why
#[derive(Debug)]
pub struct TaskFailure {
    pub task: String,
    pub error: BodyError,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task '{}' failed: {}", self.task, self.error)
    }
}

/// Outcome of one sequencer invocation
#[derive(Debug, Default)]
pub struct RunResult {
    /// Tasks that ran to completion, in order
    pub completed: Vec<String>,

    /// The failing task, if any
    pub failure: Option<TaskFailure>,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Process exit status for this result
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Runs execution plans against a registry
pub struct Sequencer<'a> {
    registry: &'a Registry,
}

impl<'a> Sequencer<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Sequencer { registry }
    }

    /// Resolve a run list into a plan
    pub fn plan<S: AsRef<str>>(&self, run_list: &[S]) -> GraphResult<ExecutionPlan> {
        ExecutionPlan::resolve(self.registry, run_list)
    }

    /// Resolve and execute a run list
    ///
    /// Resolution errors are returned before any task body runs.
    pub async fn run<S: AsRef<str>>(&self, run_list: &[S], ctx: &Context) -> GraphResult<RunResult> {
        let plan = self.plan(run_list)?;
        debug!(plan = %plan, "resolved execution plan");
        self.execute(&plan, ctx).await
    }

    /// Execute a resolved plan in order, stopping at the first failure
    pub async fn execute(&self, plan: &ExecutionPlan, ctx: &Context) -> GraphResult<RunResult> {
        // every name must resolve before the first body starts
        for name in plan.tasks() {
            self.registry.lookup(name)?;
        }

        let mut result = RunResult::default();
        let started = Instant::now();

        for name in plan.tasks() {
            let task = self.registry.lookup(name)?;
            let span = info_span!("task", task = %name);
            let task_started = Instant::now();

            info!(parent: &span, "starting");
            let outcome = task.body.run(ctx).instrument(span.clone()).await;
            let elapsed = task_started.elapsed();

            match outcome {
                Ok(()) => {
                    info!(parent: &span, elapsed = ?elapsed, "finished");
                    result.completed.push(name.clone());
                }
                Err(e) => {
                    error!(parent: &span, elapsed = ?elapsed, error = %e, "failed");
                    result.failure = Some(TaskFailure {
                        task: name.clone(),
                        error: e,
                    });
                    break;
                }
            }
        }

        debug!(
            completed = result.completed.len(),
            planned = plan.len(),
            elapsed = ?started.elapsed(),
            "run finished"
        );
        Ok(result)
    }
}
