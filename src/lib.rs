//! # cmdlisp
//!
//! Drive host-registered commands from a single line of Lisp-like text.
//!
//! ```text
//! cfg:(get-env env:prod)      // assign a command's result to a variable
//! (greet name:$cfg "and you") // named and positional arguments, variable references
//! ```
//!
//! A run parses the whole line, validates every statement against the
//! [`CommandRegistry`], then executes the statements one after another,
//! threading the variable bindings from each assignment into later
//! statements.

pub mod ast;
pub mod builtins;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod utils;

pub use ast::{ArgumentValue, Bindings, Command, Program, Statement};
pub use error::{ResolveError, RunError, SyntaxError, ValidationError};
pub use interpreter::{ExecutionResult, Interpreter};
pub use parser::parse_script;
pub use registry::{Action, CommandDefinition, CommandRegistry};

/// Parse, validate and execute `text` against `registry`.
pub async fn parse_and_run(
    text: &str,
    registry: &CommandRegistry,
) -> Result<ExecutionResult, RunError> {
    Interpreter::new(registry.clone()).parse_and_run(text).await
}
