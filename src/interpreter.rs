// Interpreter to validate and execute parsed command lines

use crate::ast::{Bindings, Program, Statement};
use crate::error::{ResolveError, RunError, ValidationError};
use crate::parser;
use crate::registry::CommandRegistry;
use crate::resolver;
use crate::utils::format_duration;
use indexmap::IndexMap;
use std::time::{Duration, Instant};

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub bindings: Bindings,
    /// Elapsed time per command name; a repeated command keeps its last timing.
    pub timings: IndexMap<String, Duration>,
    /// Number of statements executed.
    pub statements: usize,
    pub total: Duration,
}

/// Validates and runs statements against one command registry.
///
/// Each call to [`Interpreter::execute`] owns a fresh binding context, so one
/// interpreter can serve any number of independent runs.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    registry: CommandRegistry,
}

impl Interpreter {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parse, validate and execute one command line.
    pub async fn parse_and_run(&self, text: &str) -> Result<ExecutionResult, RunError> {
        let program = parser::parse_script(text)?;

        let errors = self.validate(&program);
        if !errors.is_empty() {
            tracing::warn!(count = errors.len(), "validation failed, nothing executed");
            return Err(RunError::Validation(errors));
        }

        self.execute(&program).await
    }

    /// Check every statement against the registry without running anything.
    ///
    /// All problems are reported, not just the first.
    pub fn validate(&self, program: &Program) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (index, statement) in program.statements.iter().enumerate() {
            let name = &statement.command().name;
            let Some(definition) = self.registry.get(name) else {
                errors.push(ValidationError::UnknownCommand {
                    index,
                    name: name.clone(),
                });
                continue;
            };

            if let (Statement::Command(_), Some(returns)) = (statement, definition.return_contract())
            {
                errors.push(ValidationError::MissingAssignment {
                    index,
                    name: name.clone(),
                    returns: returns.to_string(),
                });
            }
        }

        errors
    }

    pub async fn execute(&self, program: &Program) -> Result<ExecutionResult, RunError> {
        self.execute_with(program, Bindings::new()).await
    }

    /// Execute statements in order, starting from `bindings`.
    ///
    /// The first failing statement stops the run; later statements never start.
    pub async fn execute_with(
        &self,
        program: &Program,
        mut bindings: Bindings,
    ) -> Result<ExecutionResult, RunError> {
        let started = Instant::now();
        let mut timings = IndexMap::new();

        for (index, statement) in program.statements.iter().enumerate() {
            let command = statement.command();
            let definition = self.registry.get(&command.name).ok_or_else(|| {
                RunError::Validation(vec![ValidationError::UnknownCommand {
                    index,
                    name: command.name.clone(),
                }])
            })?;

            let args = resolver::resolve(&bindings, command).map_err(|e| match e {
                ResolveError::UndefinedVariable { name } => RunError::UndefinedVariable {
                    name,
                    command: command.name.clone(),
                    index,
                },
            })?;

            tracing::debug!(
                index,
                command = %command.name,
                positional = ?args.positional,
                named = ?args.named,
                "running statement"
            );

            let statement_started = Instant::now();
            let value = definition
                .action
                .call(args.positional, args.named)
                .await
                .map_err(|error| RunError::Action {
                    command: command.name.clone(),
                    index,
                    error,
                })?;
            let elapsed = statement_started.elapsed();

            tracing::info!(
                index,
                command = %command.name,
                elapsed = %format_duration(elapsed),
                "statement finished"
            );
            timings.insert(command.name.clone(), elapsed);

            if let Some(name) = statement.assigned_to() {
                bindings.insert(name.to_string(), value);
            }
        }

        Ok(ExecutionResult {
            bindings,
            timings,
            statements: program.statements.len(),
            total: started.elapsed(),
        })
    }
}
