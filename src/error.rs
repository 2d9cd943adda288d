//! Error types for parsing, validation and execution.

use thiserror::Error;

/// Malformed command text. Line and column are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    /// Render the offending source line with a caret under the failing column.
    pub fn diagnostic(&self, source: &str, filename: Option<&str>) -> String {
        let file_prefix = filename.map(|f| format!("{}:", f)).unwrap_or_default();
        let mut out = format!(
            "Parse error in {}line {}: {}",
            file_prefix, self.line, self.message
        );

        if let Some(line_content) = source.lines().nth(self.line.saturating_sub(1)) {
            let gutter = " ".repeat(self.line.to_string().len());
            out.push_str(&format!("\n\n  {} | {}", self.line, line_content));
            out.push_str(&format!(
                "\n  {} | {}^",
                gutter,
                " ".repeat(self.column.saturating_sub(1))
            ));
        }
        out
    }
}

/// Failure to turn a command's recorded arguments into plain strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("undefined variable: ${name}")]
    UndefinedVariable { name: String },
}

/// A problem found by the read-only validation pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("statement {index}: unknown command `{name}`")]
    UnknownCommand { index: usize, name: String },

    #[error(
        "statement {index}: command `{name}` returns {returns} and must be assigned to a variable"
    )]
    MissingAssignment {
        index: usize,
        name: String,
        returns: String,
    },
}

/// Errors that fail a whole `parse_and_run`.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("validation failed:\n{}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error("statement {index} (`{command}`): undefined variable: ${name}")]
    UndefinedVariable {
        name: String,
        command: String,
        index: usize,
    },

    // Cause is rendered inline; `source()` stays empty.
    #[error("statement {index} (`{command}`) failed: {error:#}")]
    Action {
        command: String,
        index: usize,
        error: anyhow::Error,
    },
}

impl RunError {
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            RunError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
