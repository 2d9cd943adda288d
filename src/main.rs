//! # cmdlisp
//!
//! Run a command line against the built-in commands.
//!
//! ## Usage
//!
//! - Inline: `cmdlisp 'out:(sh "git rev-parse HEAD") (echo built $out)'`
//! - From a file: `cmdlisp --file deploy.cmd`
//! - From another directory: `cmdlisp --dir ../app '(sh make)'`
//! - List commands: `cmdlisp --list`

use clap::Parser as ClapParser;
use cmdlisp::builtins::register_builtins;
use cmdlisp::config::{self, Config};
use cmdlisp::utils::{format_duration, run_from_dir};
use cmdlisp::{CommandRegistry, Interpreter, RunError};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI arguments for cmdlisp.
#[derive(ClapParser)]
#[command(name = "cmdlisp")]
#[command(version = PKG_VERSION)]
#[command(about = "Run registered commands from a Lisp-like command line", long_about = None)]
struct Cli {
    /// Command line to run; multiple words are joined with spaces
    #[arg(value_name = "COMMANDS", trailing_var_arg = true)]
    commands: Vec<String>,

    /// Read the command line from a file instead
    #[arg(short, long, value_name = "PATH", conflicts_with = "commands")]
    file: Option<PathBuf>,

    /// Run from this directory
    #[arg(short = 'C', long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// List all available commands
    #[arg(short, long)]
    list: bool,

    /// Log every statement (overridden by CMDLISP_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::default()
        .with_dir(cli.dir.clone())
        .verbose(cli.verbose);
    config::init_logging(&config);

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry, &config);

    if cli.list {
        print!("{}", registry.help());
        return ExitCode::SUCCESS;
    }

    let (source, filename) = match &cli.file {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, Some(path.to_string_lossy().to_string())),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => (cli.commands.join(" "), None),
    };

    let interpreter = Interpreter::new(registry);
    let run = interpreter.parse_and_run(&source);
    let outcome = match &config.dir {
        Some(dir) => match run_from_dir(dir, run).await {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("Error entering directory '{}': {}", dir.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => run.await,
    };

    match outcome {
        Ok(result) => {
            tracing::info!(
                total = %format_duration(result.total),
                statements = result.statements,
                "run complete"
            );
            if !result.bindings.is_empty() {
                match serde_json::to_string_pretty(&result.bindings) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Error rendering bindings: {}", e),
                }
            }
            ExitCode::SUCCESS
        }
        Err(RunError::Syntax(e)) => {
            eprintln!("{}", e.diagnostic(&source, filename.as_deref()));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
