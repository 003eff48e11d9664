//! Main CLI application

use crate::config::{
    parse_config_auto, parse_config_file, parse_override, resolve_vars, validate_config, Config,
};
use crate::error::RunseqError;
use crate::runner::{invoke, Context, Outcome, Registry, RunRequest, Sequencer};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Verbosity {
    /// Default log filter for this level
    pub fn filter(self) -> &'static str {
        match self {
            Verbosity::Silent => "off",
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// CLI application
pub struct App {
    /// Parsed configuration
    config: Config,
    /// Config file path
    config_path: PathBuf,
    /// Tasks built from the configuration
    registry: Registry,
}

impl App {
    /// Create a new app from the discovered configuration file
    pub fn new() -> Result<Self, RunseqError> {
        let (config, config_path) = parse_config_auto()?;
        Self::from_config(config, config_path)
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self, RunseqError> {
        let config = parse_config_file(&path)?;
        Self::from_config(config, path)
    }

    fn from_config(config: Config, config_path: PathBuf) -> Result<Self, RunseqError> {
        validate_config(&config)?;

        let registry = Registry::from_config(&config)?;
        registry.check_graph()?;

        Ok(App {
            config,
            config_path,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Directory the config file lives in; relative paths resolve against it
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build the execution context, applying `KEY=VALUE` overrides
    pub fn context(&self, overrides: &[String]) -> Result<Context, RunseqError> {
        let overrides = overrides
            .iter()
            .map(|raw| parse_override(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let config_dir = self.config_dir();
        let vars = resolve_vars(&self.config, &config_dir, &overrides)?;

        let mut ctx = Context::new()
            .with_working_dir(config_dir)
            .with_vars(vars);

        if let Some(interpreter) = &self.config.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        Ok(ctx)
    }

    /// Run the application with already parsed arguments, returning the exit status
    pub async fn run(self, matches: &ArgMatches) -> Result<i32, RunseqError> {
        if matches.get_flag("list") {
            self.print_tasks();
            return Ok(0);
        }

        let names: Vec<String> = matches
            .get_many::<String>("tasks")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let request = match RunRequest::from_names(names)
            .or_else(|| RunRequest::default_for(&self.registry))
        {
            Some(request) => request,
            None => {
                // No task specified and no default task, show help
                build_command().print_help()?;
                println!();
                self.print_tasks();
                return Ok(0);
            }
        };

        if matches.get_flag("plan") {
            return Ok(self.print_plan(&request));
        }

        let overrides: Vec<String> = matches
            .get_many::<String>("set")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let ctx = self.context(&overrides)?;

        let outcome = invoke(&self.registry, &request, &ctx).await;
        report(&outcome);
        Ok(outcome.code)
    }

    /// Print the numbered plan for a request, returning the exit status
    fn print_plan(&self, request: &RunRequest) -> i32 {
        match Sequencer::new(&self.registry).plan(&request.run_list()) {
            Ok(plan) => {
                for (index, name) in plan.tasks().iter().enumerate() {
                    println!("{:>3}. {}", index + 1, name);
                }
                0
            }
            Err(e) => {
                let outcome = Outcome::unresolved(&e);
                report(&outcome);
                outcome.code
            }
        }
    }

    /// Print the public tasks with their usage and prerequisites
    fn print_tasks(&self) {
        let title = self.config.name.as_deref().unwrap_or("runseq");
        println!("{}", format!("Tasks in {}:", title).bold());

        for task in self.registry.tasks() {
            if task.private {
                continue;
            }

            let mut line = format!("  {:<24}", task.name.cyan());
            if let Some(usage) = &task.usage {
                line.push_str(usage);
            }
            if !task.prerequisites.is_empty() {
                line.push_str(
                    &format!(" (after: {})", task.prerequisites.join(", "))
                        .bright_black()
                        .to_string(),
                );
            }
            println!("{}", line.trim_end());
        }
    }
}

/// Print the final line for an invocation
fn report(outcome: &Outcome) {
    if outcome.is_success() {
        let count = outcome
            .result
            .as_ref()
            .map(|result| result.completed.len())
            .unwrap_or(0);
        eprintln!(
            "{} {}",
            "✓".green().bold(),
            format!("{} task(s) completed", count).green().bold()
        );
        return;
    }

    if let Some(message) = &outcome.message {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("runseq")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run named build tasks in dependency order")
        .arg(
            Arg::new("tasks")
                .value_name("TASK")
                .help("Tasks to run, left to right (defaults to 'default')")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to runseq.yml config file"),
        )
        .arg(
            Arg::new("set")
                .short('D')
                .long("set")
                .value_name("KEY=VALUE")
                .help("Override a variable (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("plan")
                .long("plan")
                .help("Print the resolved execution plan without running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print warnings and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no log output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Get verbosity level from matches
pub fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Install the log subscriber; `RUST_LOG` wins over the verbosity flags
pub fn init_tracing(verbosity: Verbosity) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI application with the process arguments
pub async fn run() -> Result<i32, RunseqError> {
    let matches = build_command().get_matches();
    init_tracing(get_verbosity(&matches));

    let app = match matches.get_one::<PathBuf>("file") {
        Some(path) => App::with_config_file(path.clone())?,
        None => App::new()?,
    };

    app.run(&matches).await
}
