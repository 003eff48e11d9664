//! Configuration validation
//!
//! Structural checks on task definitions. Graph checks (unknown prerequisites,
//! cycles) happen once the tasks are registered, see `Registry::check_graph`.

use crate::config::types::{Config, Step, Task};
use crate::error::{ConfigError, ConfigResult};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for (name, task) in &config.tasks {
        validate_task(name, task)?;
    }

    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name at least one program".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::Invalid("task names must not be empty".to_string()));
    }

    for dep in &task.deps {
        if dep.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "task '{}' lists an empty prerequisite",
                name
            )));
        }
    }

    validate_steps(name, &task.run)
}

fn validate_steps(task: &str, steps: &[Step]) -> ConfigResult<()> {
    for (index, step) in steps.iter().enumerate() {
        let detail = match step {
            Step::Command(_) => continue,
            Step::Detailed(detail) => detail,
        };

        let actions = detail.actions();
        match actions.len() {
            0 => {
                return Err(ConfigError::EmptyStep {
                    task: task.to_string(),
                    index,
                })
            }
            1 => {}
            _ => {
                return Err(ConfigError::AmbiguousStep {
                    task: task.to_string(),
                    index,
                    actions: actions.join(", "),
                })
            }
        }

        if let Some(replace) = &detail.replace {
            if replace.files.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "replace step in task '{}' has no files",
                    task
                )));
            }
        }

        if let Some(copy) = &detail.copy {
            if copy.from.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "copy step in task '{}' has no sources",
                    task
                )));
            }
        }

        validate_steps(task, &detail.parallel)?;
    }

    Ok(())
}
