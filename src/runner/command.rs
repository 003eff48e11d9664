//! Shell command steps
//!
//! This module runs command lines through the configured interpreter.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command as ProcessCommand;
use tracing::{debug, info};

use crate::error::{BodyError, BodyResult};
use crate::runner::{interpolate, Context, TaskBody};

/// A command line executed through the context's interpreter
#[derive(Debug, Clone)]
pub struct ShellCommand {
    /// Command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    pub print: Option<String>,

    /// Suppress the command echo
    pub quiet: bool,

    /// Working directory, relative to the context's
    pub dir: Option<String>,
}

impl ShellCommand {
    pub fn new(exec: impl Into<String>) -> Self {
        ShellCommand {
            exec: exec.into(),
            print: None,
            quiet: false,
            dir: None,
        }
    }

    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = Some(dir.into());
        self
    }
}

#[async_trait]
impl TaskBody for ShellCommand {
    async fn run(&self, ctx: &Context) -> BodyResult<()> {
        let exec_str = interpolate(&self.exec, &ctx.vars)?;

        if !self.quiet {
            let print_str = match &self.print {
                Some(print) => interpolate(print, &ctx.vars)?,
                None => exec_str.clone(),
            };
            info!("$ {}", print_str);
        }

        let working_dir = match &self.dir {
            Some(dir) => ctx.resolve_path(&interpolate(dir, &ctx.vars)?),
            None => ctx.working_dir.clone(),
        };

        let (program, interpreter_args) = ctx.interpreter.split_first().ok_or_else(|| {
            BodyError::Failed("no interpreter configured for shell steps".to_string())
        })?;

        let mut command = ProcessCommand::new(program);
        command
            .args(interpreter_args)
            .arg(&exec_str)
            .current_dir(&working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .envs(&ctx.vars);

        debug!(dir = %working_dir.display(), "spawning command");

        let status = command.status().await.map_err(|e| BodyError::Spawn {
            command: exec_str.clone(),
            source: e,
        })?;

        if !status.success() {
            return Err(BodyError::CommandFailed {
                command: exec_str,
                code: status.code(),
            });
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.print.clone().unwrap_or_else(|| self.exec.clone())
    }
}
