// Parser implementation using pest

use crate::ast::{ArgumentValue, Command, Program, Statement};
use crate::error::SyntaxError;
use indexmap::IndexMap;
use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct ScriptParser;

/// Parse one command line into its statements, in execution order.
pub fn parse_script(input: &str) -> Result<Program, SyntaxError> {
    let pairs = ScriptParser::parse(Rule::program, input).map_err(syntax_error)?;
    let mut statements = Vec::new();

    for pair in pairs {
        if pair.as_rule() != Rule::program {
            continue;
        }
        for inner_pair in pair.into_inner() {
            match inner_pair.as_rule() {
                Rule::assignment | Rule::exec => statements.push(build_statement(inner_pair)),
                _ => {}
            }
        }
    }

    Ok(Program { statements })
}

fn syntax_error(error: pest::error::Error<Rule>) -> SyntaxError {
    let (line, column) = match error.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    SyntaxError {
        line,
        column,
        message: error.variant.message().into_owned(),
    }
}

// The grammar guarantees the shape of every pair below, so missing children
// are unreachable for any input that parsed.
fn build_statement(pair: Pair<Rule>) -> Statement {
    match pair.as_rule() {
        Rule::assignment => {
            let mut name = String::new();
            let mut command = Command::default();
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::identifier => name = inner.as_str().to_string(),
                    Rule::command => command = build_command(inner),
                    _ => {}
                }
            }
            Statement::Assignment { name, command }
        }
        _ => {
            let command = pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::command)
                .map(build_command)
                .unwrap_or_default();
            Statement::Command(command)
        }
    }
}

fn build_command(pair: Pair<Rule>) -> Command {
    let mut name = String::new();
    let mut positional = Vec::new();
    let mut named = IndexMap::new();

    for arg in pair.into_inner() {
        match arg.as_rule() {
            Rule::cmd_name => name = arg.as_str().to_string(),
            Rule::named_arg => {
                let mut inner = arg.into_inner();
                let key = inner.next().map(|p| p.as_str().to_string());
                let value = inner.next().map(build_value);
                if let (Some(key), Some(value)) = (key, value) {
                    // Repeated keys: last write wins, first position kept
                    named.insert(key, value);
                }
            }
            Rule::positional_arg => {
                if let Some(value) = arg.into_inner().next() {
                    positional.push(build_value(value));
                }
            }
            _ => {}
        }
    }

    Command {
        name,
        positional,
        named,
    }
}

fn build_value(pair: Pair<Rule>) -> ArgumentValue {
    match pair.as_rule() {
        Rule::variable_ref => {
            let name = pair
                .into_inner()
                .next()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default();
            ArgumentValue::VariableRef(name)
        }
        Rule::quoted_string => {
            let inner = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            ArgumentValue::Literal(unescape(inner))
        }
        _ => ArgumentValue::Literal(pair.as_str().to_string()),
    }
}

/// Drop the backslash from every `\X` pair.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
