// Abstract Syntax Tree definitions

use indexmap::IndexMap;

/// Variable bindings accumulated during one run.
pub type Bindings = IndexMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `(cmd ...)`, result discarded.
    Command(Command),
    /// `name:(cmd ...)`, result bound to `name`.
    Assignment { name: String, command: Command },
}

impl Statement {
    pub fn command(&self) -> &Command {
        match self {
            Statement::Command(command) => command,
            Statement::Assignment { command, .. } => command,
        }
    }

    /// The variable this statement binds, if any.
    pub fn assigned_to(&self) -> Option<&str> {
        match self {
            Statement::Command(_) => None,
            Statement::Assignment { name, .. } => Some(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Command {
    pub name: String,
    pub positional: Vec<ArgumentValue>,
    pub named: IndexMap<String, ArgumentValue>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    Literal(String),
    VariableRef(String),
}
