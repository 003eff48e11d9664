//! Task bodies
//!
//! A body is the unit of work a task runs. The sequencer treats every body the
//! same way: start it, await its single outcome, move on or stop.

use async_trait::async_trait;
use std::future::Future;
use tracing::debug;

use crate::error::BodyResult;
use crate::runner::Context;

/// The operation executed when a task runs.
///
/// Implementations must report exactly one outcome per call and must surface
/// internal failures as `Err` instead of logging and returning `Ok`.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use runseq::runner::{Context, TaskBody};
/// use runseq::error::BodyResult;
///
/// struct Touch(String);
///
/// #[async_trait]
/// impl TaskBody for Touch {
///     async fn run(&self, ctx: &Context) -> BodyResult<()> {
///         let path = ctx.resolve_path(&self.0);
///         tokio::fs::write(&path, b"")
///             .await
///             .map_err(|e| runseq::error::BodyError::io(path, e))
///     }
///
///     fn describe(&self) -> String {
///         format!("touch {}", self.0)
///     }
/// }
/// ```
#[async_trait]
pub trait TaskBody: Send + Sync {
    /// Run the body to completion.
    async fn run(&self, ctx: &Context) -> BodyResult<()>;

    /// Short human-readable description for logs and plan listings.
    fn describe(&self) -> String;
}

/// Body of an aggregate task that only exists for its prerequisites
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

#[async_trait]
impl TaskBody for Noop {
    async fn run(&self, _ctx: &Context) -> BodyResult<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "(no steps)".to_string()
    }
}

/// Body backed by a closure returning a future
///
/// The closure receives its own copy of the context.
pub struct FnBody<F> {
    label: String,
    func: F,
}

impl<F, Fut> FnBody<F>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BodyResult<()>> + Send + 'static,
{
    pub fn new(label: impl Into<String>, func: F) -> Self {
        FnBody {
            label: label.into(),
            func,
        }
    }
}

#[async_trait]
impl<F, Fut> TaskBody for FnBody<F>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BodyResult<()>> + Send + 'static,
{
    async fn run(&self, ctx: &Context) -> BodyResult<()> {
        (self.func)(ctx.clone()).await
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Box a closure as a task body
pub fn from_fn<F, Fut>(label: impl Into<String>, func: F) -> Box<dyn TaskBody>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = BodyResult<()>> + Send + 'static,
{
    Box::new(FnBody::new(label, func))
}

/// Ordered list of bodies; stops at the first failure
pub struct Steps {
    steps: Vec<Box<dyn TaskBody>>,
}

impl Steps {
    pub fn new(steps: Vec<Box<dyn TaskBody>>) -> Self {
        Steps { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[async_trait]
impl TaskBody for Steps {
    async fn run(&self, ctx: &Context) -> BodyResult<()> {
        for (index, step) in self.steps.iter().enumerate() {
            debug!(step = index, body = %step.describe(), "running step");
            step.run(ctx).await?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.steps
            .iter()
            .map(|step| step.describe())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
